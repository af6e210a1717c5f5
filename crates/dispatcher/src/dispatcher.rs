//! Dispatcher - validate, route to the configured channel, normalize

use std::time::Duration;

use tracing::{error, info, instrument, warn};

use contracts::{
    DeliveryConfig, DeliveryMethod, FailureKind, FeedbackChannel, FeedbackError, FeedbackRecord,
};
use observability::SubmissionOutcome;
use serde_json::Value;

use crate::channels::Channel;
use crate::envelope::{normalize, DispatchOutcome};
use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DeliveryConfig,
    client: Option<reqwest::Client>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DeliveryConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Use an existing HTTP client instead of building one
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Resolve the channel and build the dispatcher
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(method = %self.config.method)
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let client = match self.client {
            Some(client) => client,
            None => build_client(self.config.http_timeout_secs)?,
        };
        let channel = Channel::from_config(&self.config, client);

        info!(
            method = %channel.method(),
            site_name = self.config.resolved_site_name(),
            "Dispatcher ready"
        );
        Ok(Dispatcher::with_channel(channel))
    }
}

fn build_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, DispatcherError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("feedback-relay/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(DispatcherError::HttpClient)
}

/// Routes each submission to the single configured channel
///
/// Holds no per-request state; one instance serves every request.
pub struct Dispatcher {
    channel: Channel,
    metrics: DispatchMetrics,
}

impl Dispatcher {
    /// Create a dispatcher around an already-built channel
    pub fn with_channel(channel: Channel) -> Self {
        Self {
            channel,
            metrics: DispatchMetrics::new(),
        }
    }

    /// Configured delivery method
    pub fn method(&self) -> DeliveryMethod {
        self.channel.method()
    }

    /// Get dispatcher counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Handle a raw request body end to end
    ///
    /// Never fails: every outcome is folded into the returned envelope.
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, raw_body),
        fields(method = %self.channel.method(), body_len = raw_body.len())
    )]
    pub async fn dispatch(&self, raw_body: &[u8]) -> DispatchOutcome {
        self.metrics.inc_received();
        let result = match parse_submission(raw_body) {
            Ok(record) => self.deliver(&record).await,
            Err(err) => Err(err),
        };
        self.finish(result)
    }

    /// Handle an already-decoded record
    #[instrument(
        name = "dispatcher_submit",
        skip(self, record),
        fields(method = %self.channel.method())
    )]
    pub async fn submit(&self, record: &FeedbackRecord) -> DispatchOutcome {
        self.metrics.inc_received();
        let result = match check_reaction(record) {
            Ok(()) => self.deliver(record).await,
            Err(err) => Err(err),
        };
        self.finish(result)
    }

    /// Fold a submission the host could not read into an envelope
    pub fn reject(&self, err: FeedbackError) -> DispatchOutcome {
        self.metrics.inc_received();
        self.finish(Err(err))
    }

    async fn deliver(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        self.channel.check_preconditions()?;
        self.channel.deliver(record).await
    }

    fn finish(&self, result: Result<(), FeedbackError>) -> DispatchOutcome {
        let method = self.channel.method();
        match &result {
            Ok(()) => {
                self.metrics.inc_delivered();
                observability::record_submission(method, SubmissionOutcome::Delivered);
                info!("Feedback delivered");
            }
            Err(err) if err.kind() == FailureKind::Validation => {
                self.metrics.inc_rejected();
                observability::record_submission(method, SubmissionOutcome::Rejected);
                warn!(error = %err, "Feedback submission rejected");
            }
            Err(err) => {
                self.metrics.inc_failed();
                observability::record_submission(method, SubmissionOutcome::Failed);
                error!(error = %err, kind = ?err.kind(), "Feedback submission failed");
            }
        }
        normalize(result)
    }
}

fn parse_submission(raw_body: &[u8]) -> Result<FeedbackRecord, FeedbackError> {
    let object = match serde_json::from_slice(raw_body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return Err(FeedbackError::malformed("body is not a JSON object")),
        Err(e) => return Err(FeedbackError::malformed(e.to_string())),
    };
    let record =
        FeedbackRecord::from_object(object).map_err(|e| FeedbackError::malformed(e.to_string()))?;
    check_reaction(&record)?;
    Ok(record)
}

fn check_reaction(record: &FeedbackRecord) -> Result<(), FeedbackError> {
    if record.has_reaction() {
        Ok(())
    } else {
        Err(FeedbackError::MissingReaction)
    }
}

/// Convenience function to create a dispatcher from delivery config
pub fn create_dispatcher(config: &DeliveryConfig) -> Result<Dispatcher, DispatcherError> {
    DispatcherBuilder::new(config.clone()).build()
}
