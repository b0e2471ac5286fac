use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single mood-log record as delivered by the storage collaborator.
///
/// The aggregator only ever reads entries. A timestamp that is missing or
/// cannot be parsed is kept as `None` so the entry still shows up in raw
/// journal views but never lands in a day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(
        default,
        rename = "timestamp",
        alias = "date",
        deserialize_with = "lenient_timestamp"
    )]
    pub timestamp_utc: Option<DateTime<Utc>>,
    #[serde(default, rename = "mood", deserialize_with = "lenient_string")]
    pub mood_symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_note")]
    pub note: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub photo_ref: Option<String>,
}

impl Entry {
    pub fn new(id: impl Into<String>, timestamp_utc: Option<DateTime<Utc>>) -> Self {
        Self {
            id: id.into(),
            timestamp_utc,
            mood_symbol: None,
            note: String::new(),
            photo_ref: None,
        }
    }

    pub fn with_mood(mut self, symbol: impl Into<String>) -> Self {
        self.mood_symbol = Some(symbol.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// UTC calendar day this entry belongs to.
    pub fn utc_day(&self) -> Option<NaiveDate> {
        self.timestamp_utc.map(|ts| ts.date_naive())
    }

    /// Mood symbol with empty strings treated as absent.
    pub fn mood(&self) -> Option<&str> {
        self.mood_symbol.as_deref().filter(|s| !s.is_empty())
    }
}

/// Accepts RFC 3339 instants (any offset, normalized to UTC) or naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` values read as UTC. Anything else becomes
/// `None` instead of failing the whole snapshot.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };
    Ok(parse_timestamp(&text))
}

/// Strings pass through; any other JSON value reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_note<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Document ids are opaque; numeric ids are kept as their decimal text.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Ok(String::new()),
    }
}

/// Reads a snapshot list, dropping elements that are not entry objects
/// instead of rejecting the whole snapshot.
pub fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<Entry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let total = raw.len();
    let entries: Vec<Entry> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if entries.len() < total {
        tracing::warn!(
            dropped = total - entries.len(),
            total,
            "Malformed entries dropped from snapshot"
        );
    }
    Ok(entries)
}

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(_) => {
            tracing::debug!(value = %text, "Unparseable entry timestamp, entry left unbucketed");
            None
        }
    }
}
