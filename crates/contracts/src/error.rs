//! Layered error definitions
//!
//! Categorized by origin: config loading / submission / channel configuration / delivery

use thiserror::Error;

use crate::DeliveryMethod;

/// Unified error type
#[derive(Debug, Error)]
pub enum FeedbackError {
    // ===== Configuration Loading Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Submission Errors =====
    /// Body could not be read as a feedback record
    #[error("malformed submission: {message}")]
    MalformedSubmission { message: String },

    /// Reaction missing or blank after trimming
    #[error("submission is missing a reaction")]
    MissingReaction,

    // ===== Channel Errors =====
    /// Selected channel's settings are absent or malformed
    #[error("{channel} channel misconfigured: {message}")]
    Configuration {
        channel: DeliveryMethod,
        message: String,
    },

    /// Outbound call failed
    #[error("{channel} delivery failed: {message}")]
    Delivery {
        channel: DeliveryMethod,
        message: String,
    },

    /// No recognized delivery method configured
    #[error("no default feedback method configured")]
    Unconfigured,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure class, used to pick the caller-facing message and status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Configuration,
    Delivery,
    Unconfigured,
}

impl FeedbackError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create malformed submission error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSubmission {
            message: message.into(),
        }
    }

    /// Create channel configuration error
    pub fn configuration(channel: DeliveryMethod, message: impl Into<String>) -> Self {
        Self::Configuration {
            channel,
            message: message.into(),
        }
    }

    /// Create delivery error
    pub fn delivery(channel: DeliveryMethod, message: impl Into<String>) -> Self {
        Self::Delivery {
            channel,
            message: message.into(),
        }
    }

    /// Classify the error for envelope normalization
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedSubmission { .. } | Self::MissingReaction => FailureKind::Validation,
            Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::Configuration { .. }
            | Self::Io(_) => FailureKind::Configuration,
            Self::Delivery { .. } => FailureKind::Delivery,
            Self::Unconfigured => FailureKind::Unconfigured,
        }
    }
}
