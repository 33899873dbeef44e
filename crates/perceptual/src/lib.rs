//! # simcheck similarity scoring
//!
//! Scores how alike two normalized token sequences are, as a value in
//! `[0.0, 1.0]`.
//!
//! ## Contract
//!
//! - Consumes tokens produced by the `canonical` crate; it never normalizes
//!   or tokenizes raw text itself.
//! - Pure function of `(tokens_a, tokens_b, config)` with no I/O and no clock.
//!
//! ## Score
//!
//! 1.  **Shingle Jaccard**: each sequence becomes the set of its overlapping
//!     k-token shingles (rolling xxh3-based hash), and the term is the
//!     Jaccard overlap of the two sets. Rewards shared verbatim runs.
//! 2.  **Token edit similarity**: `1 - levenshtein / max_len` over token
//!     hashes. Rewards the same words in the same order even when every
//!     shingle is broken by small edits.
//! 3.  **Blend**: `(wj * jaccard + we * edit) / (wj + we)`, clamped.
//!
//! ```
//! use perceptual::{SimilarityConfig, SimilarityScorer};
//!
//! let scorer = SimilarityScorer::new(SimilarityConfig::default()).unwrap();
//! let a = ["the", "cat", "sat", "on", "the", "mat"];
//! let b = ["the", "cat", "sat", "on", "a", "mat"];
//!
//! let s = scorer.score("a.txt", &a, "b.txt", &b);
//! assert!(s.value > 0.0 && s.value < 1.0);
//! assert_eq!(scorer.score("a.txt", &a, "b.txt", &b).value, scorer.score("b.txt", &b, "a.txt", &a).value);
//! ```
pub mod config;
mod edit;
mod shingles;
mod similarity;

pub use crate::config::{SimilarityConfig, SimilarityError};
pub use crate::edit::{edit_similarity, levenshtein};
pub use crate::shingles::{jaccard, make_shingles_rolling, shingle_set, token_hashes};
pub use crate::similarity::{score, Metric, SimilarityScore, SimilarityScorer, TokenProfile};
