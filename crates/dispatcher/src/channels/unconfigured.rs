//! UnconfiguredChannel - fixed error channel for a missing delivery method

use contracts::{DeliveryMethod, FeedbackChannel, FeedbackError, FeedbackRecord};
use tracing::error;

/// Channel used when no recognized method is configured; never performs I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredChannel;

impl FeedbackChannel for UnconfiguredChannel {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Unconfigured
    }

    fn check_preconditions(&self) -> Result<(), FeedbackError> {
        error!("Missing feedback method for widget; set delivery.method");
        Err(FeedbackError::Unconfigured)
    }

    async fn deliver(&self, _record: &FeedbackRecord) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unconfigured)
    }
}
