//! # Dispatcher
//!
//! Feedback delivery.
//!
//! Responsibilities:
//! - Validate the raw submission body
//! - Route it to the one configured channel (email / issue tracker / webhook)
//! - Collapse every outcome into a `ResultEnvelope`

pub mod channels;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod metrics;

pub use contracts::{FeedbackChannel, FeedbackRecord, ResultEnvelope};
pub use channels::{
    validate_endpoint, Channel, EmailChannel, IssueTrackerChannel, UnconfiguredChannel,
    WebhookChannel,
};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder};
pub use envelope::{normalize, public_message, DispatchOutcome};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
