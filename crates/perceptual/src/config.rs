//! Configuration and error types for similarity scoring.
//!
//! Scoring is a pure function of `(tokens_a, tokens_b, config)`; nothing in
//! here reads the environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters of the blended similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can move a score must bump this version.
    pub version: u32,
    /// Number of tokens per shingle.
    ///
    /// Larger values reward longer verbatim runs; smaller values tolerate
    /// more reordering.
    pub shingle_size: usize,
    /// Weight of the shingle Jaccard term.
    pub jaccard_weight: f64,
    /// Weight of the token edit-distance term.
    pub edit_weight: f64,
    /// Above this many tokens on either side the quadratic edit term is
    /// skipped and the score is the Jaccard term alone.
    pub max_edit_tokens: usize,
    /// Seed for token and shingle hashing.
    pub seed: u64,
}

impl SimilarityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shingle_size(mut self, shingle_size: usize) -> Self {
        self.shingle_size = shingle_size;
        self
    }

    /// Set both blend weights. Only their ratio matters.
    pub fn with_weights(mut self, jaccard_weight: f64, edit_weight: f64) -> Self {
        self.jaccard_weight = jaccard_weight;
        self.edit_weight = edit_weight;
        self
    }

    pub fn with_max_edit_tokens(mut self, max_edit_tokens: usize) -> Self {
        self.max_edit_tokens = max_edit_tokens;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), SimilarityError> {
        if self.version < 1 {
            return Err(SimilarityError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.shingle_size < 1 {
            return Err(SimilarityError::InvalidShingleSize {
                shingle_size: self.shingle_size,
            });
        }
        let weights_ok = [self.jaccard_weight, self.edit_weight]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
            && self.jaccard_weight + self.edit_weight > 0.0;
        if !weights_ok {
            return Err(SimilarityError::InvalidWeights {
                jaccard: self.jaccard_weight,
                edit: self.edit_weight,
            });
        }
        if self.max_edit_tokens < 1 {
            return Err(SimilarityError::InvalidMaxEditTokens);
        }
        Ok(())
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shingle_size: 3,
            jaccard_weight: 0.6,
            edit_weight: 0.4,
            max_edit_tokens: 2000,
            seed: 0xF00D_BAAD_F00D_BAAD,
        }
    }
}

/// Errors returned when a scorer is built from an invalid configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: shingle_size must be >= 1 (got {shingle_size})")]
    InvalidShingleSize { shingle_size: usize },

    #[error("invalid config: weights must be finite, non-negative and not both zero (jaccard={jaccard}, edit={edit})")]
    InvalidWeights { jaccard: f64, edit: f64 },

    #[error("invalid config: max_edit_tokens must be >= 1")]
    InvalidMaxEditTokens,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SimilarityConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.shingle_size, 3);
        assert_eq!(cfg.jaccard_weight, 0.6);
        assert_eq!(cfg.edit_weight, 0.4);
        assert_eq!(cfg.max_edit_tokens, 2000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let cfg = SimilarityConfig::new()
            .with_shingle_size(5)
            .with_weights(1.0, 0.0)
            .with_max_edit_tokens(10)
            .with_seed(42);
        assert_eq!(cfg.shingle_size, 5);
        assert_eq!(cfg.jaccard_weight, 1.0);
        assert_eq!(cfg.edit_weight, 0.0);
        assert_eq!(cfg.max_edit_tokens, 10);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_validate_rejects_zero_shingle() {
        let cfg = SimilarityConfig::new().with_shingle_size(0);
        assert!(matches!(
            cfg.validate(),
            Err(SimilarityError::InvalidShingleSize { shingle_size: 0 })
        ));
    }

    #[test]
    fn config_validate_rejects_bad_weights() {
        for (j, e) in [(0.0, 0.0), (-0.1, 1.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            let cfg = SimilarityConfig::new().with_weights(j, e);
            assert!(
                matches!(cfg.validate(), Err(SimilarityError::InvalidWeights { .. })),
                "weights ({j}, {e}) should be rejected"
            );
        }
    }

    #[test]
    fn config_validate_rejects_version_zero() {
        let cfg = SimilarityConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimilarityError::InvalidConfigVersion { version: 0 })
        ));
    }

    #[test]
    fn config_partial_fills_defaults() {
        let cfg: SimilarityConfig =
            serde_json::from_str(r#"{"shingle_size": 4}"#).expect("parse config");
        assert_eq!(cfg.shingle_size, 4);
        assert_eq!(cfg.jaccard_weight, 0.6);
    }
}
