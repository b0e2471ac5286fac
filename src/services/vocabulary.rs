//! Mood vocabulary: symbol <-> valence score translation over a user's
//! ordered list of mood definitions, with a built-in default list.

use serde::Serialize;

use crate::models::mood::{MoodDefinition, MoodPatch, MoodScore, NEUTRAL_SCORE};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    #[error("Mood symbol must not be empty")]
    EmptySymbol,

    #[error("Mood symbol already defined: {0}")]
    DuplicateSymbol(String),

    #[error("Unknown mood symbol: {0}")]
    UnknownSymbol(String),

    #[error("Mood score must be between 1 and 5, got {0}")]
    ScoreOutOfRange(i64),

    #[error("Cannot remove the last mood definition")]
    LastDefinition,
}

/// The five moods used when a user has not configured their own.
pub fn default_definitions() -> Vec<MoodDefinition> {
    [
        ("😄", 5, "Great"),
        ("😊", 4, "Good"),
        ("😐", 3, "Okay"),
        ("😢", 2, "Sad"),
        ("😡", 1, "Angry"),
    ]
    .into_iter()
    .map(|(symbol, score, label)| MoodDefinition::new(symbol, MoodScore::clamped(score), label))
    .collect()
}

/// A non-empty, symbol-unique, ordered list of mood definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary {
    definitions: Vec<MoodDefinition>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            definitions: default_definitions(),
        }
    }
}

impl Vocabulary {
    /// Returns the user's override when it is non-empty, otherwise the
    /// built-in default list.
    pub fn effective(user_override: Option<&[MoodDefinition]>) -> Self {
        match user_override {
            Some(defs) if !defs.is_empty() => Self {
                definitions: defs.to_vec(),
            },
            _ => Self::default(),
        }
    }

    /// Validates a whole replacement list coming from the settings store.
    /// An empty list is accepted and means "use the default".
    pub fn validate_override(defs: &[MoodDefinition]) -> Result<(), VocabularyError> {
        for (idx, def) in defs.iter().enumerate() {
            if def.symbol.trim().is_empty() {
                return Err(VocabularyError::EmptySymbol);
            }
            if defs[..idx].iter().any(|d| d.symbol == def.symbol) {
                return Err(VocabularyError::DuplicateSymbol(def.symbol.clone()));
            }
        }
        Ok(())
    }

    pub fn definitions(&self) -> &[MoodDefinition] {
        &self.definitions
    }

    pub fn into_definitions(self) -> Vec<MoodDefinition> {
        self.definitions
    }

    /// Score of an exact symbol match. Symbols no longer in the vocabulary
    /// (or absent moods) read as neutral.
    pub fn score_of(&self, symbol: Option<&str>) -> u8 {
        symbol
            .and_then(|s| self.definitions.iter().find(|d| d.symbol == s))
            .map(|d| d.score.get())
            .unwrap_or(NEUTRAL_SCORE)
    }

    /// Definition whose score is closest to `score`. Ties go to the earliest
    /// definition in vocabulary order.
    pub fn nearest_to(&self, score: f64) -> &MoodDefinition {
        let mut best = &self.definitions[0];
        let mut best_diff = (f64::from(best.score.get()) - score).abs();
        for def in &self.definitions[1..] {
            let diff = (f64::from(def.score.get()) - score).abs();
            if diff < best_diff {
                best = def;
                best_diff = diff;
            }
        }
        best
    }

    pub fn symbol_nearest_to(&self, score: f64) -> &str {
        &self.nearest_to(score).symbol
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.definitions.iter().any(|d| d.symbol == symbol)
    }

    /// Appends a definition from free-form user input: the symbol is trimmed,
    /// a missing score defaults to neutral and out-of-range scores are
    /// clamped.
    pub fn add(
        &mut self,
        symbol: &str,
        score: Option<i64>,
        label: &str,
    ) -> Result<&MoodDefinition, VocabularyError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(VocabularyError::EmptySymbol);
        }
        if self.contains(symbol) {
            return Err(VocabularyError::DuplicateSymbol(symbol.to_string()));
        }
        let score = score.map(MoodScore::clamped).unwrap_or_default();
        self.definitions
            .push(MoodDefinition::new(symbol, score, label.trim()));
        Ok(&self.definitions[self.definitions.len() - 1])
    }

    pub fn remove(&mut self, symbol: &str) -> Result<MoodDefinition, VocabularyError> {
        let idx = self
            .definitions
            .iter()
            .position(|d| d.symbol == symbol)
            .ok_or_else(|| VocabularyError::UnknownSymbol(symbol.to_string()))?;
        if self.definitions.len() == 1 {
            return Err(VocabularyError::LastDefinition);
        }
        Ok(self.definitions.remove(idx))
    }

    pub fn update(
        &mut self,
        symbol: &str,
        patch: &MoodPatch,
    ) -> Result<&MoodDefinition, VocabularyError> {
        let score = patch.score.map(MoodScore::new).transpose()?;
        let def = self
            .definitions
            .iter_mut()
            .find(|d| d.symbol == symbol)
            .ok_or_else(|| VocabularyError::UnknownSymbol(symbol.to_string()))?;
        if let Some(score) = score {
            def.score = score;
        }
        if let Some(label) = &patch.label {
            def.label = label.trim().to_string();
        }
        Ok(def)
    }
}
