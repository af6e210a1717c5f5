//! Free-text sanitizer

use regex::Regex;
use std::sync::LazyLock;

/// Value substituted for empty fields so rendered tables never have blank cells
pub const PLACEHOLDER: &str = "N/A";

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strip markup, collapse whitespace, trim, then cut to `max_length` characters.
///
/// Empty input (or input that is empty once markup is gone) yields
/// [`PLACEHOLDER`]. The placeholder obeys the same length bound. The cut is a
/// hard character cut; a space exposed at the end by the cut is trimmed so
/// that `sanitize(sanitize(s, n), n) == sanitize(s, n)`.
pub fn sanitize(input: &str, max_length: Option<usize>) -> String {
    let stripped = TAG.replace_all(input, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");

    let text = match collapsed.trim() {
        "" => PLACEHOLDER,
        trimmed => trimmed,
    };

    match max_length {
        Some(max) => truncate(text, max),
        None => text.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].trim_end().to_string(),
        None => text.to_string(),
    }
}
