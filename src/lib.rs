//! Workspace umbrella crate for simcheck.
//!
//! simcheck answers three questions about text:
//!
//! - **compare**: how similar are two uploaded documents?
//! - **detect plagiarism**: which sentences of a text appear in outside
//!   sources, and how much of the text do they cover?
//! - **extract keywords**: which terms best describe a text?
//!
//! The [`Engine`] stitches the stage crates together. Each stage has its own
//! configuration section, loaded from one YAML file via [`EngineConfig`]:
//!
//! | Stage | Crate |
//! |-------|-------|
//! | decoding, tokens, sentences | `canonical` |
//! | similarity scoring | `perceptual` |
//! | candidate sources | `retriever` |
//! | per-sentence matching | `matcher` |
//! | keyword ranking | `keywords` |
//!
//! ```no_run
//! use std::time::Duration;
//! use simcheck::{Engine, EngineConfig, FileInput, PlagiarismInput};
//!
//! # async fn run() -> Result<(), simcheck::EngineError> {
//! let engine = Engine::from_config(EngineConfig::default())?;
//!
//! let a = FileInput::new("a.txt", "The cat sat on the mat.");
//! let b = FileInput::new("b.txt", "The cat sat on a mat.");
//! println!("{}", engine.compare(&a, &b)?.similarity);
//!
//! let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
//! let report = engine
//!     .detect_plagiarism(PlagiarismInput::text("The cat sat on the mat."), deadline)
//!     .await?;
//! println!("{:?}", report.message);
//!
//! for kw in engine.extract_keywords(Some("SEO SEO keywords matter for SEO"))? {
//!     println!("{} {:.2}", kw.term, kw.weight);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
mod engine;
mod error;

pub use crate::config::{ConfigLoadError, EngineConfig};
pub use crate::engine::{Comparison, Engine, FileInput, PlagiarismInput};
pub use crate::error::EngineError;

pub use canonical::{
    collapse_whitespace, CanonicalError, CanonicalizeConfig, Document, MediaType, SegmentConfig,
    Sentence, Token,
};
pub use keywords::{KeywordConfig, KeywordScore};
pub use matcher::{
    MatchConfig, MatchResult, PlagiarismReport, SentenceStatus, NO_MATCHES_MESSAGE,
    NO_SENTENCES_MESSAGE,
};
pub use perceptual::{Metric, SimilarityConfig, SimilarityScore};
pub use retriever::{Candidate, CandidateRetriever, RetrievalError, RetrieverConfig, RetrieverKind};
