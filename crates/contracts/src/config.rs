//! RelayConfig - Config Loader output
//!
//! Describes the whole process configuration: listener, delivery method, site
//! label and the per-channel credentials/targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Placeholder used when no site name is configured
pub const DEFAULT_SITE_NAME: &str = "Your Site";

/// Default transactional email provider base URL
pub const DEFAULT_EMAIL_API_BASE: &str = "https://api.resend.com";

/// Default issue tracker base URL
pub const DEFAULT_ISSUE_TRACKER_API_BASE: &str = "https://api.github.com";

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Full process configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RelayConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// HTTP listener settings
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Delivery channel settings
    #[serde(default)]
    #[validate(nested)]
    pub delivery: DeliveryConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Socket address to bind (e.g. "0.0.0.0:3000")
    #[serde(default = "default_bind")]
    #[validate(length(min = 1))]
    pub bind: String,

    /// Public origin of this server, used to resolve rooted webhook paths
    #[serde(default)]
    #[validate(url)]
    pub public_origin: Option<String>,

    /// Prometheus exporter port (None = disabled)
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_origin: None,
            metrics_port: None,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

/// Delivery configuration, read-only once the process has started
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DeliveryConfig {
    /// Selected channel
    #[serde(default)]
    pub method: DeliveryMethod,

    /// Display label injected into rendered content
    #[serde(default)]
    #[validate(length(max = 100))]
    pub site_name: String,

    /// Outbound HTTP client timeout in seconds (None = client default)
    #[serde(default)]
    #[validate(range(min = 1))]
    pub http_timeout_secs: Option<u64>,

    /// Transactional email settings
    #[serde(default)]
    #[validate(nested)]
    pub email: EmailSettings,

    /// Issue tracker settings
    #[serde(default)]
    #[validate(nested)]
    pub issue_tracker: IssueTrackerSettings,

    /// Webhook settings
    #[serde(default)]
    pub webhook: WebhookSettings,
}

impl DeliveryConfig {
    /// Site name, falling back to the placeholder when blank
    pub fn resolved_site_name(&self) -> &str {
        match self.site_name.trim() {
            "" => DEFAULT_SITE_NAME,
            name => name,
        }
    }
}

/// Delivery channel selector
///
/// Anything that is not a recognized method deserializes to `Unconfigured`,
/// which always fails at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryMethod {
    /// Transactional email
    Email,
    /// Issue tracker (GitHub-compatible)
    IssueTracker,
    /// Arbitrary webhook
    Webhook,
    /// Missing or unrecognized method
    #[default]
    Unconfigured,
}

impl DeliveryMethod {
    /// Parse a configured method, accepting the legacy strategy names
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "issue-tracker" | "issue_tracker" | "github" => Self::IssueTracker,
            "webhook" | "custom-endpoint" | "custom_endpoint" => Self::Webhook,
            _ => Self::Unconfigured,
        }
    }

    /// Canonical name (used in logs and metric labels)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::IssueTracker => "issue-tracker",
            Self::Webhook => "webhook",
            Self::Unconfigured => "unconfigured",
        }
    }
}

impl From<String> for DeliveryMethod {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DeliveryMethod> for String {
    fn from(method: DeliveryMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transactional email provider settings
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct EmailSettings {
    #[serde(default)]
    pub api_key: String,

    /// Sender address (without display name)
    #[serde(default)]
    pub from: String,

    /// Recipient address
    #[serde(default)]
    pub to: String,

    #[serde(default = "default_email_api_base")]
    #[validate(url)]
    pub api_base: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from: String::new(),
            to: String::new(),
            api_base: default_email_api_base(),
        }
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("api_key", &redact(&self.api_key))
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_email_api_base() -> String {
    DEFAULT_EMAIL_API_BASE.to_string()
}

/// Issue tracker settings
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct IssueTrackerSettings {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_issue_tracker_api_base")]
    #[validate(url)]
    pub api_base: String,
}

impl Default for IssueTrackerSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
            api_base: default_issue_tracker_api_base(),
        }
    }
}

impl fmt::Debug for IssueTrackerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueTrackerSettings")
            .field("token", &redact(&self.token))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_issue_tracker_api_base() -> String {
    DEFAULT_ISSUE_TRACKER_API_BASE.to_string()
}

/// Webhook settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// Absolute http(s) URL or a rooted same-origin path
    #[serde(default)]
    pub endpoint: String,

    /// Origin that rooted paths are resolved against
    #[serde(default)]
    pub origin: Option<String>,
}

/// Mask a secret for display, keeping only whether it is set
pub fn redact(secret: &str) -> &'static str {
    if secret.trim().is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
