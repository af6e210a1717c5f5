//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{DeliveryMethod, RelayConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::config::resolve_config;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    bind: String,
    method: String,
    site_name: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let result = validate_config(args);
    info!(source = %result.config_source, valid = result.valid, "Validated configuration");

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_source = match &args.config.config {
        Some(path) => path.display().to_string(),
        None => "<defaults + environment>".to_string(),
    };

    match resolve_config(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_source,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    bind: config.server.bind.clone(),
                    method: config.delivery.method.to_string(),
                    site_name: config.delivery.resolved_site_name().to_string(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_source,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
///
/// A loadable config can still fail every submission; these point at why.
fn collect_warnings(config: &RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let delivery = &config.delivery;

    let mut require = |value: &str, setting: &str| {
        if value.trim().is_empty() {
            warnings.push(format!(
                "{setting} is empty - submissions will fail with a configuration error"
            ));
        }
    };

    match delivery.method {
        DeliveryMethod::Email => {
            require(&delivery.email.api_key, "delivery.email.api_key");
            require(&delivery.email.from, "delivery.email.from");
            require(&delivery.email.to, "delivery.email.to");
        }
        DeliveryMethod::IssueTracker => {
            require(&delivery.issue_tracker.token, "delivery.issue_tracker.token");
            require(&delivery.issue_tracker.owner, "delivery.issue_tracker.owner");
            require(&delivery.issue_tracker.repo, "delivery.issue_tracker.repo");
        }
        DeliveryMethod::Webhook => {
            if let Err(e) = dispatcher::validate_endpoint(&delivery.webhook.endpoint) {
                warnings.push(format!("delivery.webhook.endpoint: {e}"));
            }
        }
        DeliveryMethod::Unconfigured => {
            warnings.push(
                "delivery.method is not set - every submission will be answered with a failure"
                    .to_string(),
            );
        }
    }

    if delivery.site_name.trim().is_empty() {
        warnings.push(format!(
            "delivery.site_name is empty - using \"{}\"",
            delivery.resolved_site_name()
        ));
    }

    if delivery.http_timeout_secs.is_none() && delivery.method != DeliveryMethod::Unconfigured {
        warnings.push(
            "delivery.http_timeout_secs is unset - a slow provider can hold a request indefinitely"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_source);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Bind: {}", summary.bind);
            println!("  Method: {}", summary.method);
            println!("  Site: {}", summary.site_name);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
