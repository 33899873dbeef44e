//! # simcheck Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` turns a [`canonical::Document`] into a [`PlagiarismReport`]. It
//! segments the document, asks a [`retriever::CandidateRetriever`] for
//! possible sources of every sentence, scores each candidate with a
//! [`perceptual::SimilarityScorer`] and folds the per-sentence outcomes into
//! an aggregate.
//!
//! Each request moves through [`MatchPhase`]s:
//! `Segmenting -> Retrieving -> Scoring -> Aggregating -> Done`, where
//! retrieval and scoring repeat per sentence and may fail for one sentence
//! without failing the request.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: candidates per sentence (`k`), `match_threshold`,
//!   concurrency, sentence cap and candidate windowing.
//! - [`MatchResult`]: a sentence, its best candidate when that clears the
//!   threshold, the best score seen and a [`SentenceStatus`].
//! - [`PlagiarismReport`]: results in document order, aggregate similarity
//!   (sum of matched scores over *all* evaluated sentences), counts and an
//!   optional message.
//! - [`PlagiarismMatcher`]: runs the check with bounded concurrency and a
//!   request deadline.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use canonical::{CanonicalizeConfig, Document, MediaType, SegmentConfig};
//! use matcher::{MatchConfig, PlagiarismMatcher};
//! use perceptual::{SimilarityConfig, SimilarityScorer};
//! use retriever::EmptyRetriever;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scorer = SimilarityScorer::new(SimilarityConfig::default())?;
//! let matcher = PlagiarismMatcher::new(
//!     MatchConfig::default(),
//!     SegmentConfig::default(),
//!     scorer,
//!     Arc::new(EmptyRetriever),
//! )?;
//!
//! let doc = Document::new(
//!     "essay",
//!     "The cat sat on the mat.",
//!     MediaType::PlainText,
//!     CanonicalizeConfig::default(),
//! )?;
//! let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
//! let report = matcher.check(&doc, deadline).await;
//! assert_eq!(report.matched_sentences, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-check latency and sentence counts. Phases and per-sentence failures are
//! logged through `tracing`.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::PlagiarismMatcher;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::types::{
    MatchConfig, MatchError, MatchPhase, MatchResult, PlagiarismReport, SentenceStatus,
    NO_MATCHES_MESSAGE, NO_SENTENCES_MESSAGE,
};
