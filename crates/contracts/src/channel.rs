//! FeedbackChannel trait - Dispatcher output interface
//!
//! Defines the abstract interface for delivery adapters.

use crate::{DeliveryMethod, FeedbackError, FeedbackRecord};

/// Delivery adapter trait
///
/// Each implementation wraps exactly one outbound protocol call.
#[trait_variant::make(FeedbackChannel: Send)]
pub trait LocalFeedbackChannel {
    /// Channel this adapter serves (used for logging/metrics)
    fn method(&self) -> DeliveryMethod;

    /// Check channel settings before any outbound I/O
    ///
    /// # Errors
    /// Returns a configuration-class error naming the offending setting
    fn check_preconditions(&self) -> Result<(), FeedbackError>;

    /// Deliver a validated record
    ///
    /// # Errors
    /// Returns a typed error (should include provider context)
    async fn deliver(&self, record: &FeedbackRecord) -> Result<(), FeedbackError>;
}
