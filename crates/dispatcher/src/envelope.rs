//! Response envelope normalization
//!
//! Every dispatch outcome is collapsed into one of the two `ResultEnvelope`
//! shapes plus an HTTP status code. Caller-facing text comes only from the
//! fixed messages below; error detail stays in the logs.

use contracts::{FailureKind, FeedbackError, ResultEnvelope};

pub const SUCCESS_MESSAGE: &str = "Thank you for your feedback!";
pub const MISSING_REACTION_MESSAGE: &str = "Please select a feedback option.";
pub const MALFORMED_MESSAGE: &str = "Invalid feedback submission.";
pub const CONFIGURATION_MESSAGE: &str =
    "A server configuration error occurred. Please try again later.";
pub const DELIVERY_MESSAGE: &str = "A server error occurred while submitting feedback.";
pub const UNCONFIGURED_MESSAGE: &str =
    "Submission Failed. Please Provide a Default Feedback Method.";

/// Envelope plus the status code to set on the transport response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status_code: u16,
    pub envelope: ResultEnvelope,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.envelope.is_success()
    }
}

/// Map a dispatch result onto the envelope and status code
pub fn normalize(result: Result<(), FeedbackError>) -> DispatchOutcome {
    match result {
        Ok(()) => DispatchOutcome {
            status_code: 200,
            envelope: ResultEnvelope::success(SUCCESS_MESSAGE),
        },
        Err(err) => DispatchOutcome {
            status_code: status_code(&err),
            envelope: ResultEnvelope::failure(public_message(&err)),
        },
    }
}

/// Caller-safe message for an error; never includes the error's own text
pub fn public_message(err: &FeedbackError) -> &'static str {
    match err {
        FeedbackError::MissingReaction => MISSING_REACTION_MESSAGE,
        FeedbackError::MalformedSubmission { .. } => MALFORMED_MESSAGE,
        other => match other.kind() {
            FailureKind::Validation => MALFORMED_MESSAGE,
            FailureKind::Configuration => CONFIGURATION_MESSAGE,
            FailureKind::Delivery => DELIVERY_MESSAGE,
            FailureKind::Unconfigured => UNCONFIGURED_MESSAGE,
        },
    }
}

fn status_code(err: &FeedbackError) -> u16 {
    match err.kind() {
        FailureKind::Validation => 400,
        FailureKind::Configuration | FailureKind::Delivery | FailureKind::Unconfigured => 500,
    }
}
