//! HTML email body renderer
//!
//! Produces a self-contained fragment with inline styles only, since mail
//! clients do not load external stylesheets.

use contracts::{FeedbackRecord, RenderedContent};

use crate::fields::{raw_json, DisplayFields};

const LABEL_CELL: &str = "font-weight: bold; padding: 8px 12px; border-bottom: 1px solid #eee; \
                          border-right: 1px solid #eee; background: #f8fafc;";
const VALUE_CELL: &str = "padding: 8px 12px; border-bottom: 1px solid #eee;";

/// Render the feedback email (subject + HTML body)
pub fn render_email(record: &FeedbackRecord, site_name: &str) -> RenderedContent {
    let fields = DisplayFields::from_record(record);

    let route_block = [
        ("Path", &fields.path),
        ("Full Path", &fields.full_path),
        ("Name", &fields.name),
        ("Hash", &fields.hash),
        ("Redirected From", &fields.redirected_from),
    ]
    .iter()
    .map(|(label, value)| format!("<div><b>{label}:</b> {}</div>", escape_html(value)))
    .chain(std::iter::once(format!(
        "<div><b>Query:</b> <code>{}</code></div>",
        escape_html(&fields.query)
    )))
    .collect::<Vec<_>>()
    .join("\n              ");

    let body = format!(
        r#"<div style="font-family: Arial, sans-serif; color: #222;">
  <h2>New Feedback Received</h2>
  <table style="border: 1px solid #bbb; border-radius: 8px; border-collapse: separate; border-spacing: 0; margin-bottom: 1em;">
    <tbody>
      {topic}
      {reaction}
      <tr>
        <td style="{LABEL_CELL}">Message:</td>
        <td style="{VALUE_CELL} white-space: pre-line;">{message}</td>
      </tr>
      <tr>
        <td style="{LABEL_CELL}">Route:</td>
        <td style="{VALUE_CELL}">
              {route_block}
        </td>
      </tr>
      <tr>
        <td style="font-weight: bold; padding: 8px 12px; background: #f8fafc; border-right: 1px solid #eee;">Timestamp:</td>
        <td style="padding: 8px 12px;">{timestamp}</td>
      </tr>
    </tbody>
  </table>
  <div style="margin-top: 1em;">
    <div style="font-weight: bold; margin-bottom: 0.5em;">Raw JSON</div>
    <pre style="background: #f4f4f4; padding: 1em; border-radius: 4px; overflow-x: auto; font-size: 0.875rem;">{raw}</pre>
  </div>
</div>
"#,
        topic = row("Topic", &fields.topic),
        reaction = row("Reaction", &fields.reaction),
        message = escape_html(&fields.message),
        timestamp = escape_html(&fields.timestamp),
        raw = escape_html(&raw_json(record)),
    );

    RenderedContent {
        title: format!("New Feedback Submission ({site_name})"),
        body,
    }
}

fn row(label: &str, value: &str) -> String {
    format!(
        r#"<tr>
        <td style="{LABEL_CELL}">{label}:</td>
        <td style="{VALUE_CELL}">{}</td>
      </tr>"#,
        escape_html(value)
    )
}

/// Escape text for embedding in HTML element content or attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{MESSAGE_MAX_CHARS, TOPIC_MAX_CHARS};
    use contracts::{CaptureTime, FeedbackMetadata};

    fn record() -> FeedbackRecord {
        FeedbackRecord {
            topic: "Docs".into(),
            reaction: "Satisfied".into(),
            message: "Great <b>site</b> & fast".into(),
            metadata: FeedbackMetadata {
                time: CaptureTime {
                    timestamp: "2025-05-19T10:30:00Z".into(),
                    timezone: "UTC".into(),
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_subject_includes_site_name() {
        let content = render_email(&record(), "Acme Docs");
        assert_eq!(content.title, "New Feedback Submission (Acme Docs)");
    }

    #[test]
    fn test_body_contains_sanitized_fields() {
        let content = render_email(&record(), "Acme");
        assert!(content.body.contains("Great site &amp; fast"));
        assert!(content.body.contains(">Satisfied<"));
        assert!(content.body.contains("May 19, 2025, 10:30:00 AM (UTC)"));
        assert!(content.body.contains("<b>Hash:</b> N/A"));
    }

    #[test]
    fn test_raw_json_is_escaped() {
        let content = render_email(&record(), "Acme");
        assert!(content.body.contains("Raw JSON"));
        assert!(content.body.contains("Great &lt;b&gt;site&lt;/b&gt; &amp; fast"));
        assert!(!content.body.contains("<b>site</b>"));
    }

    #[test]
    fn test_script_never_reaches_body() {
        let mut hostile = record();
        hostile.message = "<script>alert('x')</script>".into();
        hostile.topic = "<img src=x onerror=alert(1)>".into();
        let content = render_email(&hostile, "Acme");
        assert!(!content.body.contains("<script"));
        assert!(!content.body.contains("<img"));
    }

    #[test]
    fn test_inline_styles_only() {
        let content = render_email(&record(), "Acme");
        assert!(!content.body.contains("<link"));
        assert!(!content.body.contains("<style"));
        assert!(content.body.contains("style=\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_free_text_is_bounded() {
        let mut long = record();
        long.topic = "t".repeat(20);
        long.message = "m".repeat(1500);
        let content = render_email(&long, "Acme");

        assert!(content.body.contains(&format!(">{}<", "t".repeat(TOPIC_MAX_CHARS))));
        assert!(content.body.contains(&format!(">{}<", "m".repeat(MESSAGE_MAX_CHARS))));

        // The raw dump still carries the full message
        assert!(content.body.contains(&"m".repeat(1500)));
    }

    #[test]
    fn test_raw_json_is_the_submitted_object() {
        let object = serde_json::json!({ "option": "Neutral", "widget": "v2" })
            .as_object()
            .cloned()
            .unwrap();
        let submitted = FeedbackRecord::from_object(object).unwrap();
        let content = render_email(&submitted, "Acme");

        assert!(content.body.contains("&quot;option&quot;: &quot;Neutral&quot;"));
        assert!(content.body.contains("&quot;widget&quot;: &quot;v2&quot;"));
    }
}
