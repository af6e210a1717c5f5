//! ResultEnvelope - the only value ever returned to the widget
//!
//! Two JSON shapes, nothing else:
//! - `{"status":"success","message":"..."}`
//! - `{"error":true,"status":"failure","message":"..."}`

use serde::{Deserialize, Serialize};

/// Response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope", into = "WireEnvelope")]
pub enum ResultEnvelope {
    Success { message: String },
    Failure { message: String },
}

impl ResultEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> EnvelopeStatus {
        match self {
            Self::Success { .. } => EnvelopeStatus::Success,
            Self::Failure { .. } => EnvelopeStatus::Failure,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Failure { message } => message,
        }
    }
}

/// Envelope status field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Failure,
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<bool>,
    status: EnvelopeStatus,
    message: String,
}

impl From<ResultEnvelope> for WireEnvelope {
    fn from(envelope: ResultEnvelope) -> Self {
        match envelope {
            ResultEnvelope::Success { message } => Self {
                error: None,
                status: EnvelopeStatus::Success,
                message,
            },
            ResultEnvelope::Failure { message } => Self {
                error: Some(true),
                status: EnvelopeStatus::Failure,
                message,
            },
        }
    }
}

impl TryFrom<WireEnvelope> for ResultEnvelope {
    type Error = String;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        match (wire.status, wire.error) {
            (EnvelopeStatus::Success, None) => Ok(Self::success(wire.message)),
            (EnvelopeStatus::Failure, Some(true)) => Ok(Self::failure(wire.message)),
            (status, error) => Err(format!(
                "inconsistent envelope: status={status:?}, error={error:?}"
            )),
        }
    }
}
