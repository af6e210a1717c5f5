//! # Render
//!
//! Turns an untrusted `FeedbackRecord` into channel-specific content.
//!
//! Responsibilities:
//! - Sanitize free-text fields (markup stripping, whitespace, length bounds)
//! - Render the HTML email body
//! - Render the Markdown issue body
//!
//! Raw user input never reaches rendered output; the only exception is the
//! raw-JSON dump appended for operators, which is escaped for its target format.

mod email;
mod fields;
mod issue;
mod sanitize;

pub use email::render_email;
pub use fields::{
    format_timestamp, MESSAGE_MAX_CHARS, REACTION_MAX_CHARS, ROUTE_MAX_CHARS, TOPIC_MAX_CHARS,
};
pub use issue::render_issue;
pub use sanitize::{sanitize, PLACEHOLDER};
