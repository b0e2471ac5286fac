//! # MoodArc: Request/Response DTOs
//!
//! All HTTP contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Field validation is expressed via `validator` derive macros

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::MAX_WINDOW_DAYS;
use crate::models::entry::{lenient_entries, Entry};
use crate::models::mood::{MoodDefinition, MoodPatch, MoodScore};
use crate::services::journal::JournalGroup;
use crate::services::quotes::Quote;
use crate::services::trends::{InsightSummary, MoodStats, TrendWindow};
use crate::services::vocabulary::VocabularyError;

// ============================================================================
// Entries
// ============================================================================

/// PUT /api/users/{user_id}/entries
#[derive(Debug, Deserialize)]
pub struct ReplaceEntriesRequest {
    #[serde(deserialize_with = "lenient_entries")]
    pub entries: Vec<Entry>,
}

/// Acknowledgment for snapshot replacement
#[derive(Debug, Serialize)]
pub struct SnapshotAckResponse {
    pub user_id: String,
    pub revision: u64,
    pub entries: usize,
    /// Entries without a usable timestamp, kept but never bucketed
    pub unbucketed: usize,
}

// ============================================================================
// Moods
// ============================================================================

/// One definition inside PUT /api/users/{user_id}/moods
#[derive(Debug, Deserialize, Validate)]
pub struct MoodDefinitionRequest {
    #[validate(length(min = 1, max = 16, message = "Symbol must be 1-16 characters"))]
    pub symbol: String,

    #[validate(range(min = 1, max = 5, message = "Score must be 1-5"))]
    pub score: i64,

    #[validate(length(max = 40, message = "Label must be under 40 characters"))]
    #[serde(default)]
    pub label: String,
}

impl TryFrom<MoodDefinitionRequest> for MoodDefinition {
    type Error = VocabularyError;

    fn try_from(req: MoodDefinitionRequest) -> Result<Self, Self::Error> {
        Ok(MoodDefinition::new(
            req.symbol.trim(),
            MoodScore::new(req.score)?,
            req.label.trim(),
        ))
    }
}

/// PUT /api/users/{user_id}/moods. An empty list restores the defaults
#[derive(Debug, Deserialize)]
pub struct ReplaceMoodsRequest {
    pub moods: Vec<MoodDefinitionRequest>,
}

/// POST /api/users/{user_id}/moods
///
/// Free-form settings input: score is optional and clamped into 1-5.
#[derive(Debug, Deserialize, Validate)]
pub struct AddMoodRequest {
    #[validate(length(min = 1, max = 16, message = "Symbol must be 1-16 characters"))]
    pub symbol: String,

    pub score: Option<i64>,

    #[validate(length(max = 40, message = "Label must be under 40 characters"))]
    #[serde(default)]
    pub label: String,
}

/// PATCH /api/users/{user_id}/moods/{symbol}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMoodRequest {
    pub score: Option<i64>,

    #[validate(length(max = 40, message = "Label must be under 40 characters"))]
    pub label: Option<String>,
}

impl From<UpdateMoodRequest> for MoodPatch {
    fn from(req: UpdateMoodRequest) -> Self {
        MoodPatch {
            score: req.score,
            label: req.label,
        }
    }
}

/// Effective vocabulary for a user
#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub revision: u64,
    pub is_default: bool,
    pub moods: Vec<MoodDefinition>,
}

// ============================================================================
// Stats
// ============================================================================

/// GET /api/users/{user_id}/stats query params
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StatsQuery {
    /// Reference day for the streak. Default: today (UTC).
    pub today: Option<NaiveDate>,

    /// Trailing window size. Default: server configuration.
    #[validate(range(min = 1, max = 90, message = "days must be 1-90"))]
    pub days: Option<u32>,
}

/// POST /api/stats: stats over an inline snapshot, nothing stored
#[derive(Debug, Deserialize, Validate)]
pub struct ComputeStatsRequest {
    #[serde(deserialize_with = "lenient_entries")]
    pub entries: Vec<Entry>,

    #[serde(default)]
    pub moods: Vec<MoodDefinition>,

    pub today: Option<NaiveDate>,

    #[validate(range(min = 1, max = 90, message = "days must be 1-90"))]
    pub days: Option<u32>,
}

/// Chart + insight view model. `no_data` tells clients to render an empty
/// state instead of a chart of zeros.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatsView {
    NoData,
    Ready {
        labels: Vec<String>,
        series: Vec<f64>,
        mean: f64,
        summary: &'static str,
        window: TrendWindow,
        insights: InsightSummary,
    },
}

impl From<Option<MoodStats>> for StatsView {
    fn from(stats: Option<MoodStats>) -> Self {
        match stats {
            None => StatsView::NoData,
            Some(stats) => StatsView::Ready {
                labels: stats.window.labels().into_iter().map(str::to_string).collect(),
                series: stats.window.values(),
                mean: stats.mean,
                summary: stats.insights.trend.as_str(),
                window: stats.window,
                insights: stats.insights,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub revision: u64,
    pub today: NaiveDate,
    #[serde(flatten)]
    pub view: StatsView,
}

/// Broadcast to WebSocket subscribers after every snapshot change
#[derive(Debug, Serialize)]
pub struct StatsChangedEvent<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user_id: &'a str,
    pub revision: u64,
    pub stats: &'a StatsView,
}

pub fn clamp_window_days(days: Option<u32>, default: usize) -> usize {
    days.map(|d| d as usize).unwrap_or(default).clamp(1, MAX_WINDOW_DAYS)
}

// ============================================================================
// Calendar
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    /// Mood of the most recent entry that has one
    pub symbol: Option<String>,
    pub entry_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub revision: u64,
    pub days: BTreeMap<NaiveDate, CalendarDay>,
}

// ============================================================================
// Journal
// ============================================================================

/// GET /api/users/{user_id}/journal query params
#[derive(Debug, Default, Deserialize, Validate)]
pub struct JournalQuery {
    /// Comma-separated mood symbols; empty = any mood
    pub moods: Option<String>,

    /// Case-insensitive note search
    #[validate(length(max = 200, message = "Search must be under 200 characters"))]
    pub q: Option<String>,

    pub today: Option<NaiveDate>,
}

impl JournalQuery {
    pub fn mood_symbols(&self) -> Vec<String> {
        self.moods
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct JournalResponse<'a> {
    pub revision: u64,
    pub total: usize,
    pub matched: usize,
    pub groups: Vec<JournalGroup<'a>>,
}

// ============================================================================
// Quote of the day
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub quote: Quote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_view_shape() {
        let json = serde_json::to_value(StatsView::NoData).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_data" }));
    }

    #[test]
    fn test_stats_query_rejects_out_of_range_days() {
        let query = StatsQuery {
            today: None,
            days: Some(0),
        };
        assert!(query.validate().is_err());

        let query = StatsQuery {
            today: None,
            days: Some(30),
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_mood_definition_request_conversion() {
        let req: MoodDefinitionRequest =
            serde_json::from_str(r#"{"symbol":" 🥳 ","score":5,"label":"Party"}"#).unwrap();
        assert!(req.validate().is_ok());
        let def = MoodDefinition::try_from(req).unwrap();
        assert_eq!(def.symbol, "🥳");
        assert_eq!(def.score.get(), 5);
    }

    #[test]
    fn test_mood_definition_request_validation() {
        let req: MoodDefinitionRequest =
            serde_json::from_str(r#"{"symbol":"","score":6}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("symbol"));
        assert!(fields.contains_key("score"));
    }

    #[test]
    fn test_journal_query_mood_symbols() {
        let query = JournalQuery {
            moods: Some("😄, ,😢".into()),
            ..JournalQuery::default()
        };
        assert_eq!(query.mood_symbols(), ["😄", "😢"]);
        assert!(JournalQuery::default().mood_symbols().is_empty());
    }

    #[test]
    fn test_clamp_window_days() {
        assert_eq!(clamp_window_days(None, 7), 7);
        assert_eq!(clamp_window_days(Some(30), 7), 30);
        assert_eq!(clamp_window_days(Some(500), 7), MAX_WINDOW_DAYS);
    }
}
