use serde::{Deserialize, Serialize};

use crate::services::vocabulary::VocabularyError;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;
pub const NEUTRAL_SCORE: u8 = 3;

/// Valence score of a mood, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    pub const NEUTRAL: MoodScore = MoodScore(NEUTRAL_SCORE);

    /// Strict constructor used when a stored vocabulary is replaced.
    pub fn new(raw: i64) -> Result<Self, VocabularyError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&raw) {
            return Err(VocabularyError::ScoreOutOfRange(raw));
        }
        Ok(Self(raw as u8))
    }

    /// Lenient constructor for free-form user input: out-of-range values are
    /// pulled to the nearest bound.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(MIN_SCORE, MAX_SCORE) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = VocabularyError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<MoodScore> for u8 {
    fn from(score: MoodScore) -> Self {
        score.0
    }
}

impl Default for MoodScore {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// One user-configurable mood: a symbol (usually an emoji), its valence
/// score and a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodDefinition {
    pub symbol: String,
    pub score: MoodScore,
    #[serde(default)]
    pub label: String,
}

impl MoodDefinition {
    pub fn new(symbol: impl Into<String>, score: MoodScore, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            score,
            label: label.into(),
        }
    }
}

/// Partial update applied by `PATCH /api/users/:user_id/moods/:symbol`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoodPatch {
    pub score: Option<i64>,
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_rejects_out_of_range() {
        assert!(MoodScore::new(0).is_err());
        assert!(MoodScore::new(6).is_err());
        assert_eq!(MoodScore::new(5).unwrap().get(), 5);
    }

    #[test]
    fn test_score_clamps_user_input() {
        assert_eq!(MoodScore::clamped(-4).get(), 1);
        assert_eq!(MoodScore::clamped(9).get(), 5);
        assert_eq!(MoodScore::clamped(2).get(), 2);
    }

    #[test]
    fn test_definition_deserialize_validates_score() {
        let ok: MoodDefinition =
            serde_json::from_str(r#"{"symbol":"🙂","score":4,"label":"Fine"}"#).unwrap();
        assert_eq!(ok.score.get(), 4);

        let bad = serde_json::from_str::<MoodDefinition>(r#"{"symbol":"🙂","score":7}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_definition_label_defaults_to_empty() {
        let def: MoodDefinition = serde_json::from_str(r#"{"symbol":"🙂","score":4}"#).unwrap();
        assert_eq!(def.label, "");
        assert_eq!(serde_json::to_value(&def).unwrap()["score"], 4);
    }
}
