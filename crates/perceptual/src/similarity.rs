use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{SimilarityConfig, SimilarityError};
use crate::edit::edit_similarity;
use crate::shingles::{jaccard, shingle_set, token_hashes};

/// Which terms produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Weighted blend of shingle Jaccard and token edit similarity.
    Blend,
    /// Jaccard alone, either by configuration or because the inputs were too
    /// long for the edit term.
    ShingleJaccard,
    /// Edit similarity alone (Jaccard weight is zero).
    TokenEdit,
}

/// A similarity value in `[0.0, 1.0]` between two identified token sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub value: f64,
    pub left: String,
    pub right: String,
    pub metric: Metric,
}

/// Token hashes and shingle set of one sequence, computed once and reused
/// across many comparisons.
#[derive(Debug, Clone)]
pub struct TokenProfile {
    hashes: Vec<u64>,
    shingles: HashSet<u64>,
}

impl TokenProfile {
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Validated scorer. Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    cfg: SimilarityConfig,
}

impl SimilarityScorer {
    pub fn new(cfg: SimilarityConfig) -> Result<Self, SimilarityError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.cfg
    }

    pub fn profile<S: AsRef<str>>(&self, tokens: &[S]) -> TokenProfile {
        let hashes = token_hashes(tokens, self.cfg.seed);
        let shingles = shingle_set(&hashes, self.cfg.shingle_size, self.cfg.seed);
        TokenProfile { hashes, shingles }
    }

    /// Scores two identified token sequences.
    pub fn score<S: AsRef<str>>(
        &self,
        left_id: &str,
        left: &[S],
        right_id: &str,
        right: &[S],
    ) -> SimilarityScore {
        let (value, metric) = self.compare(&self.profile(left), &self.profile(right));
        SimilarityScore {
            value,
            left: left_id.to_string(),
            right: right_id.to_string(),
            metric,
        }
    }

    /// Similarity of two pre-computed profiles.
    ///
    /// Identical sequences (including two empty ones) score exactly 1.0 and
    /// an empty sequence against a non-empty one scores 0.0. The result is
    /// symmetric in its arguments.
    pub fn compare(&self, a: &TokenProfile, b: &TokenProfile) -> (f64, Metric) {
        let max_len = a.len().max(b.len());
        let metric = self.metric_for(max_len);

        if a.hashes == b.hashes {
            return (1.0, metric);
        }
        if a.is_empty() || b.is_empty() {
            return (0.0, metric);
        }

        let value = match metric {
            Metric::ShingleJaccard => jaccard(&a.shingles, &b.shingles),
            Metric::TokenEdit => edit_similarity(&a.hashes, &b.hashes),
            Metric::Blend => {
                let j = jaccard(&a.shingles, &b.shingles);
                let e = edit_similarity(&a.hashes, &b.hashes);
                let total = self.cfg.jaccard_weight + self.cfg.edit_weight;
                (self.cfg.jaccard_weight * j + self.cfg.edit_weight * e) / total
            }
        };
        (value.clamp(0.0, 1.0), metric)
    }

    fn metric_for(&self, max_len: usize) -> Metric {
        if self.cfg.edit_weight == 0.0 || max_len > self.cfg.max_edit_tokens {
            Metric::ShingleJaccard
        } else if self.cfg.jaccard_weight == 0.0 {
            Metric::TokenEdit
        } else {
            Metric::Blend
        }
    }
}

/// One-shot similarity of two token sequences.
///
/// ```
/// use perceptual::{score, SimilarityConfig};
///
/// let cfg = SimilarityConfig::default();
/// let a = ["the", "quick", "brown", "fox"];
/// assert_eq!(score(&a, &a, &cfg).unwrap(), 1.0);
/// ```
pub fn score<S: AsRef<str>>(
    a: &[S],
    b: &[S],
    cfg: &SimilarityConfig,
) -> Result<f64, SimilarityError> {
    let scorer = SimilarityScorer::new(cfg.clone())?;
    Ok(scorer.compare(&scorer.profile(a), &scorer.profile(b)).0)
}
