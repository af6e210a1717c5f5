//! Configuration validation
//!
//! Rules:
//! - derive-level checks (`validator` attributes on the config structs)
//! - `server.bind` is a socket address
//! - provider `api_base` values are http(s) URLs
//! - `server.public_origin` and `webhook.origin` are http(s) URLs when set
//!
//! Channel credentials are not required here; a blank secret is a dispatch-time
//! configuration failure, reported by `validate` as a warning.

use std::net::SocketAddr;

use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};
use contracts::{FeedbackError, RelayConfig};

/// Validate a RelayConfig
///
/// Returns the first error encountered.
pub fn validate(config: &RelayConfig) -> Result<(), FeedbackError> {
    config
        .validate()
        .map_err(|errors| first_violation("", &errors))?;
    validate_bind(config)?;
    validate_http_urls(config)?;
    Ok(())
}

/// Flatten the derive output to the first offending field path
fn first_violation(prefix: &str, errors: &ValidationErrors) -> FeedbackError {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let message = list
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("failed '{}' check", e.code),
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                return FeedbackError::config_validation(path, message);
            }
            ValidationErrorsKind::Struct(nested) => return first_violation(&path, nested),
            ValidationErrorsKind::List(items) => {
                if let Some((idx, nested)) = items.iter().next() {
                    return first_violation(&format!("{path}[{idx}]"), nested);
                }
            }
        }
    }
    FeedbackError::config_validation(prefix, errors.to_string())
}

fn validate_bind(config: &RelayConfig) -> Result<(), FeedbackError> {
    let bind = config.server.bind.trim();
    bind.parse::<SocketAddr>().map_err(|e| {
        FeedbackError::config_validation(
            "server.bind",
            format!("'{bind}' is not a socket address: {e}"),
        )
    })?;
    Ok(())
}

fn validate_http_urls(config: &RelayConfig) -> Result<(), FeedbackError> {
    let delivery = &config.delivery;
    let required = [
        ("delivery.email.api_base", delivery.email.api_base.as_str()),
        (
            "delivery.issue_tracker.api_base",
            delivery.issue_tracker.api_base.as_str(),
        ),
    ];
    for (field, value) in required {
        require_http(field, value)?;
    }

    let optional = [
        ("server.public_origin", config.server.public_origin.as_deref()),
        ("delivery.webhook.origin", delivery.webhook.origin.as_deref()),
    ];
    for (field, value) in optional {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            require_http(field, value)?;
        }
    }
    Ok(())
}

fn require_http(field: &str, value: &str) -> Result<(), FeedbackError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(FeedbackError::config_validation(
            field,
            format!("'{value}' must be an http(s) URL"),
        ))
    }
}
