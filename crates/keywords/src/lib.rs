//! Keyword extraction over normalized tokens.
//!
//! Terms are ranked by frequency relative to the document's content tokens
//! (tokens that are neither stop words nor shorter than `min_term_chars`).
//! Stop words are excluded outright rather than down-weighted, and ranking
//! is fully deterministic: weight first, then first occurrence.

mod config;
mod extract;
mod stopwords;

use thiserror::Error;

pub use crate::config::KeywordConfig;
pub use crate::extract::{extract, KeywordExtractor, KeywordScore};
pub use crate::stopwords::StopWords;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeywordError {
    #[error("document has no tokens")]
    EmptyInput,
    #[error("invalid keyword config: {0}")]
    InvalidConfig(String),
}
