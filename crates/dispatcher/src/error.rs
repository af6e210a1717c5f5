//! Dispatcher error types

use thiserror::Error;

/// Errors raised while building a dispatcher
///
/// Per-submission failures are `contracts::FeedbackError` and never surface here.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Outbound HTTP client could not be constructed
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
