//! Markdown issue body renderer

use contracts::{FeedbackRecord, RenderedContent};

use crate::fields::{raw_json, DisplayFields};

/// Render the issue (title + Markdown body)
pub fn render_issue(record: &FeedbackRecord, site_name: &str) -> RenderedContent {
    let fields = DisplayFields::from_record(record);

    let rows = [
        ("Topic", &fields.topic),
        ("Reaction", &fields.reaction),
        ("Message", &fields.message),
        ("Path", &fields.path),
        ("Full Path", &fields.full_path),
        ("Route Name", &fields.name),
        ("Hash", &fields.hash),
        ("Redirected From", &fields.redirected_from),
        ("Query", &fields.query),
        ("Timestamp", &fields.timestamp),
    ]
    .iter()
    .map(|(label, value)| format!("| **{label}** | {} |", escape_cell(value)))
    .collect::<Vec<_>>()
    .join("\n");

    let raw = raw_json(record);
    let fence = "`".repeat(longest_backtick_run(&raw).max(2) + 1);

    let body = format!(
        "## New Feedback Received\n\n\
         | Field | Value |\n\
         | --- | --- |\n\
         {rows}\n\n\
         <details>\n\
         <summary>Raw JSON</summary>\n\n\
         {fence}json\n\
         {raw}\n\
         {fence}\n\n\
         </details>\n"
    );

    RenderedContent {
        title: format!("[Feedback] {site_name}"),
        body,
    }
}

/// Keep a value inside its table cell
fn escape_cell(value: &str) -> String {
    value.replace('\\', "\\\\").replace('|', "\\|")
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}
