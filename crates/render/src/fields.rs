//! Sanitized display values shared by the email and issue renderers

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use contracts::{CaptureTime, FeedbackRecord};

use crate::sanitize::{sanitize, PLACEHOLDER};

/// Maximum characters kept from `topic`
pub const TOPIC_MAX_CHARS: usize = 15;
/// Maximum characters kept from `reaction`
pub const REACTION_MAX_CHARS: usize = 100;
/// Maximum characters kept from `message`
pub const MESSAGE_MAX_CHARS: usize = 1000;
/// Maximum characters kept from each route/time field
pub const ROUTE_MAX_CHARS: usize = 500;

const TIMEZONE_MAX_CHARS: usize = 64;

/// Every value a renderer embeds, already sanitized
pub(crate) struct DisplayFields {
    pub topic: String,
    pub reaction: String,
    pub message: String,
    pub path: String,
    pub full_path: String,
    pub name: String,
    pub hash: String,
    pub redirected_from: String,
    pub query: String,
    pub timestamp: String,
}

impl DisplayFields {
    pub fn from_record(record: &FeedbackRecord) -> Self {
        let route = &record.metadata.route;
        let bounded = |value: &str| sanitize(value, Some(ROUTE_MAX_CHARS));

        let redirected_from = route
            .redirect()
            .map(|value| bounded(&value.to_string()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let query = serde_json::to_string(&route.query).unwrap_or_else(|_| "{}".to_string());

        Self {
            topic: sanitize(&record.topic, Some(TOPIC_MAX_CHARS)),
            reaction: sanitize(&record.reaction, Some(REACTION_MAX_CHARS)),
            message: sanitize(&record.message, Some(MESSAGE_MAX_CHARS)),
            path: bounded(&route.path),
            full_path: bounded(&route.full_path),
            name: bounded(route.name_label().as_deref().unwrap_or_default()),
            hash: bounded(&route.hash),
            redirected_from,
            query: bounded(&query),
            timestamp: format_timestamp(&record.metadata.time),
        }
    }
}

const CLOCK_FORMAT: &str = "%B %-d, %Y, %-I:%M:%S %p";

/// Format capture time as `May 19, 2025, 12:30:00 PM (Europe/Berlin)`.
///
/// The clock time is converted into the record's IANA zone. When the zone is
/// unknown the timestamp's own offset is used and named instead. Timestamps
/// that are not RFC 3339 are shown sanitized as given.
pub fn format_timestamp(time: &CaptureTime) -> String {
    match DateTime::parse_from_rfc3339(time.timestamp.trim()) {
        Ok(parsed) => match time.timezone.trim().parse::<Tz>() {
            Ok(zone) => format!(
                "{} ({})",
                parsed.with_timezone(&zone).format(CLOCK_FORMAT),
                zone.name()
            ),
            Err(_) => format!("{} ({})", parsed.format(CLOCK_FORMAT), offset_label(parsed)),
        },
        Err(_) => {
            let when = sanitize(&time.timestamp, Some(ROUTE_MAX_CHARS));
            let zone = sanitize(&time.timezone, Some(TIMEZONE_MAX_CHARS));
            format!("{when} ({zone})")
        }
    }
}

fn offset_label(parsed: DateTime<FixedOffset>) -> String {
    if parsed.offset().local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        format!("UTC{}", parsed.format("%:z"))
    }
}

/// Pretty JSON of the submitted record, unsanitized, for operator debugging
pub(crate) fn raw_json(record: &FeedbackRecord) -> String {
    serde_json::to_string_pretty(&record.original_json())
        .unwrap_or_else(|e| format!("{{\"error\": \"record not serializable: {e}\"}}"))
}
