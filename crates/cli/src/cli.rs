//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Feedback Relay - delivers widget feedback to email, an issue tracker or a webhook
#[derive(Parser, Debug)]
#[command(
    name = "feedback-relay",
    author,
    version,
    about = "Feedback delivery relay",
    long_about = "Receives feedback submissions on POST /api/submit-feedback and delivers\n\
                  each one through the configured channel: transactional email, an issue\n\
                  tracker, or a custom webhook."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "FEEDBACK_RELAY_VERBOSE"
    )]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FEEDBACK_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Validate configuration without serving
    Validate(ValidateArgs),

    /// Display the resolved configuration (secrets redacted)
    Info(InfoArgs),
}

/// Configuration source plus environment overrides, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to configuration file (TOML or JSON); defaults plus environment when omitted
    #[arg(short, long, env = "FEEDBACK_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override listen address (e.g. 0.0.0.0:3000)
    #[arg(long, env = "FEEDBACK_RELAY_BIND")]
    pub bind: Option<String>,

    /// Override delivery method (email, issue-tracker, webhook)
    #[arg(long, env = "FEEDBACK_METHOD")]
    pub method: Option<String>,

    /// Override site display name
    #[arg(long, env = "FEEDBACK_SITE_NAME")]
    pub site_name: Option<String>,

    /// Email provider API key
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Email sender address
    #[arg(long, env = "RESEND_FROM_EMAIL")]
    pub resend_from_email: Option<String>,

    /// Email recipient address
    #[arg(long, env = "RESEND_TO_EMAIL")]
    pub resend_to_email: Option<String>,

    /// Issue tracker access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Issue tracker repository owner
    #[arg(long, env = "GITHUB_OWNER")]
    pub github_owner: Option<String>,

    /// Issue tracker repository name
    #[arg(long, env = "GITHUB_REPO")]
    pub github_repo: Option<String>,

    /// Webhook endpoint (absolute URL or rooted path)
    #[arg(long, env = "FEEDBACK_WEBHOOK_URL")]
    pub webhook_url: Option<String>,
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Prometheus exporter port (overrides server.metrics_port)
    #[arg(long, env = "FEEDBACK_RELAY_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Resolve configuration and exit without serving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
