//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{redact, DeliveryMethod, RelayConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::config::resolve_config;

/// Configuration info for JSON output; secrets are reduced to set/unset
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    server: ServerInfo,
    delivery: DeliveryInfo,
}

#[derive(Serialize)]
struct ServerInfo {
    bind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_port: Option<u16>,
}

#[derive(Serialize)]
struct DeliveryInfo {
    method: String,
    site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_timeout_secs: Option<u64>,
    /// Settings of the selected channel only
    settings: Vec<(&'static str, String)>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = resolve_config(&args.config).context("Failed to resolve configuration")?;
    info!(method = %config.delivery.method, "Loaded configuration info");

    let config_info = build_config_info(&config);
    if args.json {
        let json = serde_json::to_string_pretty(&config_info)
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config_info);
    }

    Ok(())
}

fn build_config_info(config: &RelayConfig) -> ConfigInfo {
    let delivery = &config.delivery;
    let settings = match delivery.method {
        DeliveryMethod::Email => vec![
            ("api_key", redact(&delivery.email.api_key).to_string()),
            ("from", delivery.email.from.clone()),
            ("to", delivery.email.to.clone()),
            ("api_base", delivery.email.api_base.clone()),
        ],
        DeliveryMethod::IssueTracker => vec![
            ("token", redact(&delivery.issue_tracker.token).to_string()),
            ("owner", delivery.issue_tracker.owner.clone()),
            ("repo", delivery.issue_tracker.repo.clone()),
            ("api_base", delivery.issue_tracker.api_base.clone()),
        ],
        DeliveryMethod::Webhook => vec![
            ("endpoint", delivery.webhook.endpoint.clone()),
            (
                "origin",
                delivery.webhook.origin.clone().unwrap_or_default(),
            ),
        ],
        DeliveryMethod::Unconfigured => Vec::new(),
    };

    ConfigInfo {
        version: format!("{:?}", config.version),
        server: ServerInfo {
            bind: config.server.bind.clone(),
            public_origin: config.server.public_origin.clone(),
            metrics_port: config.server.metrics_port,
        },
        delivery: DeliveryInfo {
            method: delivery.method.to_string(),
            site_name: delivery.resolved_site_name().to_string(),
            http_timeout_secs: delivery.http_timeout_secs,
            settings,
        },
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Feedback Relay Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🌐 Server");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Bind: {}", info.server.bind);
    if let Some(ref origin) = info.server.public_origin {
        println!("   ├─ Public origin: {}", origin);
    }
    match info.server.metrics_port {
        Some(port) => println!("   └─ Metrics: :{}", port),
        None => println!("   └─ Metrics: disabled"),
    }

    let delivery = &info.delivery;
    println!("\n📤 Delivery");
    println!("   ├─ Method: {}", delivery.method);
    println!("   ├─ Site: {}", delivery.site_name);
    match delivery.http_timeout_secs {
        Some(secs) => println!("   ├─ Timeout: {}s", secs),
        None => println!("   ├─ Timeout: client default"),
    }

    if delivery.settings.is_empty() {
        println!("   └─ (no channel selected)");
    } else {
        println!("   └─ Settings");
        for (i, (name, value)) in delivery.settings.iter().enumerate() {
            let prefix = if i == delivery.settings.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("      {} {}: {}", prefix, name, value);
        }
    }

    println!();
}
