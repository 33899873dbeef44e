use serde::{Deserialize, Serialize};

use crate::KeywordError;

/// Keyword extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeywordConfig {
    /// Length of the ranked output.
    pub max_keywords: usize,
    /// Terms with fewer characters are never keywords.
    pub min_term_chars: usize,
    /// Replaces the built-in English list when set.
    pub stop_words: Option<Vec<String>>,
    /// Added on top of whichever list is active.
    pub extra_stop_words: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_keywords: 10,
            min_term_chars: 2,
            stop_words: None,
            extra_stop_words: Vec::new(),
        }
    }
}

impl KeywordConfig {
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), KeywordError> {
        if self.max_keywords == 0 {
            return Err(KeywordError::InvalidConfig(
                "max_keywords must be >= 1".into(),
            ));
        }
        if self.min_term_chars == 0 {
            return Err(KeywordError::InvalidConfig(
                "min_term_chars must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
