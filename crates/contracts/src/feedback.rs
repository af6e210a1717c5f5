//! FeedbackRecord - a single widget submission
//!
//! Deserialization is lenient: missing or `null` optional fields fall back to
//! their defaults, so only the reaction gate decides whether a well-formed
//! object is accepted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reaction values offered by the widget out of the box
pub const DEFAULT_REACTIONS: [&str; 3] = ["Unsatisfied", "Neutral", "Satisfied"];

/// Validated, in-flight feedback submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Short free-text label (optional)
    #[serde(default, deserialize_with = "nullable")]
    pub topic: String,

    /// Selected reaction (required, non-blank)
    #[serde(default, alias = "option", deserialize_with = "nullable")]
    pub reaction: String,

    /// Free-text body (optional)
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,

    /// Client-side context captured at submission time
    #[serde(default, deserialize_with = "nullable")]
    pub metadata: FeedbackMetadata,

    /// The submitted object as received, unknown fields included
    #[serde(skip)]
    pub original: Option<Map<String, Value>>,
}

impl FeedbackRecord {
    /// Decode a submitted JSON object, keeping the object itself alongside
    /// the typed fields.
    pub fn from_object(object: Map<String, Value>) -> serde_json::Result<Self> {
        let mut record: Self = serde_json::from_value(Value::Object(object.clone()))?;
        record.original = Some(object);
        Ok(record)
    }

    /// Whether the reaction is present after trimming
    pub fn has_reaction(&self) -> bool {
        !self.reaction.trim().is_empty()
    }

    /// The record as the client sent it; records built in code fall back to
    /// their serialized fields.
    pub fn original_json(&self) -> Map<String, Value> {
        match &self.original {
            Some(object) => object.clone(),
            None => match serde_json::to_value(self) {
                Ok(Value::Object(object)) => object,
                _ => Map::new(),
            },
        }
    }
}

/// Submission metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackMetadata {
    #[serde(default, deserialize_with = "nullable")]
    pub route: RouteSnapshot,

    #[serde(default, deserialize_with = "nullable")]
    pub time: CaptureTime,
}

/// Snapshot of the client navigation state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSnapshot {
    #[serde(default, deserialize_with = "nullable")]
    pub path: String,

    #[serde(default, deserialize_with = "nullable")]
    pub full_path: String,

    /// Route name; routers allow non-string names, so keep the raw value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, deserialize_with = "nullable")]
    pub hash: String,

    #[serde(default, deserialize_with = "nullable")]
    pub query: Map<String, Value>,

    /// Location the client was redirected from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<Value>,
}

impl RouteSnapshot {
    /// Route name as display text, if it carries one
    pub fn name_label(&self) -> Option<String> {
        match &self.name {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Redirect origin, treating an explicit `null` as absent
    pub fn redirect(&self) -> Option<&Value> {
        self.redirected_from.as_ref().filter(|v| !v.is_null())
    }
}

/// Client capture time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureTime {
    /// ISO-8601 timestamp
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,

    /// IANA timezone name
    #[serde(default, deserialize_with = "nullable")]
    pub timezone: String,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
