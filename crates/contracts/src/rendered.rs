//! RenderedContent - channel-specific payload produced by the renderer

use serde::Serialize;

/// Title + body pair handed to an adapter; not retained after delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedContent {
    /// Email subject or issue title
    pub title: String,
    /// HTML fragment (email) or Markdown (issue tracker)
    pub body: String,
}
