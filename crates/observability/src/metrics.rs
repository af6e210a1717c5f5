//! Feedback pipeline metrics
//!
//! Thin wrappers over the `metrics` facade so metric names and labels live in
//! one place. Without an installed recorder every call is a no-op.

use contracts::DeliveryMethod;
use metrics::{counter, histogram};

/// Submission outcome label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Delivered by the channel
    Delivered,
    /// Rejected by validation (400-class)
    Rejected,
    /// Configuration, delivery or unconfigured failure (500-class)
    Failed,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Record one finished submission
pub fn record_submission(method: DeliveryMethod, outcome: SubmissionOutcome) {
    counter!(
        "feedback_relay_submissions_total",
        "channel" => method.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record wall time spent in the outbound call
pub fn record_delivery_latency_ms(method: DeliveryMethod, latency_ms: f64) {
    histogram!(
        "feedback_relay_delivery_latency_ms",
        "channel" => method.as_str()
    )
    .record(latency_ms);
}

/// Record the HTTP status returned by a provider
pub fn record_provider_status(method: DeliveryMethod, status: u16) {
    counter!(
        "feedback_relay_provider_responses_total",
        "channel" => method.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
}
