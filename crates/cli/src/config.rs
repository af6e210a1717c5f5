//! Configuration resolution: file (optional), then environment/CLI overrides.

use std::net::SocketAddr;

use config_loader::ConfigLoader;
use contracts::{DeliveryMethod, FeedbackError, RelayConfig};
use tracing::{debug, info};

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::server::SUBMIT_PATH;

/// Load the configuration file if given, apply overrides and re-validate
pub fn resolve_config(args: &ConfigArgs) -> Result<RelayConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)?
        }
        None => {
            info!("No configuration file given, using defaults and environment");
            RelayConfig::default()
        }
    };

    apply_overrides(&mut config, args);
    default_webhook_origin(&mut config);
    ConfigLoader::validate(&config)?;
    reject_webhook_loop(&config)?;
    Ok(config)
}

fn apply_overrides(config: &mut RelayConfig, args: &ConfigArgs) {
    fn set(target: &mut String, value: Option<&str>, name: &str) {
        if let Some(value) = value {
            debug!(setting = name, "Overriding from CLI/environment");
            *target = value.to_string();
        }
    }

    set(&mut config.server.bind, args.bind.as_deref(), "server.bind");
    if let Some(method) = &args.method {
        config.delivery.method = DeliveryMethod::parse(method);
        debug!(method = %config.delivery.method, "Overriding delivery method");
    }
    set(&mut config.delivery.site_name, args.site_name.as_deref(), "delivery.site_name");

    let email = &mut config.delivery.email;
    set(&mut email.api_key, args.resend_api_key.as_deref(), "delivery.email.api_key");
    set(&mut email.from, args.resend_from_email.as_deref(), "delivery.email.from");
    set(&mut email.to, args.resend_to_email.as_deref(), "delivery.email.to");

    let tracker = &mut config.delivery.issue_tracker;
    set(&mut tracker.token, args.github_token.as_deref(), "delivery.issue_tracker.token");
    set(&mut tracker.owner, args.github_owner.as_deref(), "delivery.issue_tracker.owner");
    set(&mut tracker.repo, args.github_repo.as_deref(), "delivery.issue_tracker.repo");

    set(
        &mut config.delivery.webhook.endpoint,
        args.webhook_url.as_deref(),
        "delivery.webhook.endpoint",
    );
}

/// Rooted webhook paths resolve against this server unless an origin is set
fn default_webhook_origin(config: &mut RelayConfig) {
    let webhook = &mut config.delivery.webhook;
    if webhook.origin.as_deref().is_some_and(|o| !o.trim().is_empty()) {
        return;
    }
    webhook.origin = config
        .server
        .public_origin
        .clone()
        .filter(|o| !o.trim().is_empty())
        .or_else(|| local_origin(&config.server.bind));
}

/// A webhook aimed at this server's own submit route would resubmit forever
fn reject_webhook_loop(config: &RelayConfig) -> Result<()> {
    let webhook = &config.delivery.webhook;
    let endpoint = webhook.endpoint.trim();
    if config.delivery.method != DeliveryMethod::Webhook || endpoint.is_empty() {
        return Ok(());
    }

    let target = if endpoint.starts_with('/') {
        let origin = webhook.origin.as_deref().unwrap_or_default().trim();
        format!("{}{endpoint}", origin.trim_end_matches('/'))
    } else {
        endpoint.to_string()
    };
    let target = strip_query(&target);

    let own_routes = [
        config.server.public_origin.clone(),
        local_origin(&config.server.bind),
    ]
    .into_iter()
    .flatten()
    .map(|origin| format!("{}{SUBMIT_PATH}", origin.trim().trim_end_matches('/')));

    for own in own_routes {
        if target.eq_ignore_ascii_case(&own) {
            return Err(FeedbackError::config_validation(
                "delivery.webhook.endpoint",
                format!("'{endpoint}' points back at this server's {SUBMIT_PATH} route"),
            )
            .into());
        }
    }
    Ok(())
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].trim_end_matches('/')
}

/// `http://<bind>`, with an unspecified address replaced by loopback
fn local_origin(bind: &str) -> Option<String> {
    let mut addr: SocketAddr = bind.trim().parse().ok()?;
    if addr.ip().is_unspecified() {
        let loopback: std::net::IpAddr = match addr {
            SocketAddr::V4(_) => std::net::Ipv4Addr::LOCALHOST.into(),
            SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
        };
        addr.set_ip(loopback);
    }
    Some(format!("http://{addr}"))
}
