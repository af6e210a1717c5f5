//! # Contracts
//!
//! Shared data model for the feedback relay. Every other crate depends on this
//! one and never the other way around.
//!
//! ## Wire model
//! - `FeedbackRecord` uses camelCase field names, matching what the widget posts.
//! - `ResultEnvelope` has exactly two JSON shapes (success / failure).
//! - Configuration structs use snake_case keys, matching the TOML config file.

mod channel;
mod config;
mod envelope;
mod error;
mod feedback;
mod rendered;

pub use channel::{FeedbackChannel, LocalFeedbackChannel};
pub use config::*;
pub use envelope::{EnvelopeStatus, ResultEnvelope};
pub use error::*;
pub use feedback::*;
pub use rendered::RenderedContent;
