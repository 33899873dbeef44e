use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::KeywordConfig;
use crate::stopwords::StopWords;
use crate::KeywordError;

/// A ranked keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub term: String,
    /// `tf` divided by the number of content tokens in the document.
    pub weight: f64,
    /// Occurrences of `term`.
    pub tf: usize,
    /// Index of the first occurrence in the token sequence.
    pub first_position: usize,
}

/// Ranks terms of normalized token sequences.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    cfg: KeywordConfig,
    stop_words: StopWords,
}

impl KeywordExtractor {
    pub fn new(cfg: KeywordConfig) -> Result<Self, KeywordError> {
        cfg.validate()?;
        let mut stop_words = match &cfg.stop_words {
            Some(words) => StopWords::from_words(words),
            None => StopWords::english(),
        };
        stop_words.extend(&cfg.extra_stop_words);
        Ok(Self { cfg, stop_words })
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.cfg
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    fn is_content(&self, term: &str) -> bool {
        term.chars().count() >= self.cfg.min_term_chars && !self.stop_words.contains(term)
    }

    /// Ranked keywords of `tokens`, best first.
    ///
    /// Stop words and short terms are dropped before counting, so they
    /// neither rank nor dilute the weights of the remaining terms. Ties in
    /// weight go to the term that appears first.
    pub fn extract<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<KeywordScore>, KeywordError> {
        if tokens.is_empty() {
            return Err(KeywordError::EmptyInput);
        }

        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut content_tokens = 0usize;
        for (position, token) in tokens.iter().enumerate() {
            let term = token.as_ref();
            if !self.is_content(term) {
                continue;
            }
            content_tokens += 1;
            counts.entry(term).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<KeywordScore> = counts
            .into_iter()
            .map(|(term, (tf, first_position))| KeywordScore {
                term: term.to_string(),
                weight: tf as f64 / content_tokens as f64,
                tf,
                first_position,
            })
            .collect();
        // Weights share a denominator, so ordering by tf is ordering by weight.
        ranked.sort_by(|a, b| {
            b.tf
                .cmp(&a.tf)
                .then_with(|| a.first_position.cmp(&b.first_position))
        });
        ranked.truncate(self.cfg.max_keywords);

        debug!(
            tokens = tokens.len(),
            content_tokens,
            keywords = ranked.len(),
            "keywords extracted"
        );
        Ok(ranked)
    }
}

/// One-shot extraction with `cfg`.
///
/// ```
/// use canonical::{tokenize, CanonicalizeConfig};
/// use keywords::{extract, KeywordConfig};
///
/// let tokens = tokenize("SEO SEO keywords matter for SEO", &CanonicalizeConfig::default());
/// let ranked = extract(&tokens, &KeywordConfig::default()).unwrap();
/// assert_eq!(ranked[0].term, "seo");
/// ```
pub fn extract<S: AsRef<str>>(
    tokens: &[S],
    cfg: &KeywordConfig,
) -> Result<Vec<KeywordScore>, KeywordError> {
    KeywordExtractor::new(cfg.clone())?.extract(tokens)
}
