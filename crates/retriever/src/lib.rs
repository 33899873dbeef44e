//! Candidate source retrieval.
//!
//! A [`CandidateRetriever`] turns a query (the tokens of one sentence) into
//! at most `k` [`Candidate`] texts that may be the origin of that sentence.
//! Implementations:
//!
//! - [`EmptyRetriever`]: no sources configured
//! - [`CorpusRetriever`]: in-memory reference documents
//! - [`WebSearchRetriever`]: HTTP search endpoint plus page fetching
//! - [`BoundedRetriever`]: per-call timeout around any of the above
//!
//! Retrieval failures are reported per query and never poison the caller:
//! one slow or broken source only costs the sentence that asked for it.

use std::sync::Arc;

use async_trait::async_trait;
use canonical::Token;
use serde::{Deserialize, Serialize};

mod bounded;
pub mod config;
mod corpus;
mod empty;
mod error;
pub mod retry;
mod serde_millis;
mod web;

pub use crate::bounded::BoundedRetriever;
pub use crate::config::{build_retriever, RetrieverConfig, RetrieverKind, WebSearchConfig};
pub use crate::corpus::CorpusRetriever;
pub use crate::empty::EmptyRetriever;
pub use crate::error::RetrievalError;
pub use crate::retry::{execute_with_retry_async, is_retryable_error, RetryConfig, RetryResult};
pub use crate::web::WebSearchRetriever;

/// A potential source of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// URL or corpus key.
    pub source: String,
    pub text: String,
    /// 0-based position in the retriever's own ranking.
    pub rank: usize,
}

#[async_trait]
pub trait CandidateRetriever: Send + Sync {
    /// Returns at most `k` candidates for `query`, best first.
    async fn retrieve(&self, query: &[Token], k: usize) -> Result<Vec<Candidate>, RetrievalError>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<R: CandidateRetriever + ?Sized> CandidateRetriever for Arc<R> {
    async fn retrieve(&self, query: &[Token], k: usize) -> Result<Vec<Candidate>, RetrievalError> {
        (**self).retrieve(query, k).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Query string for text-based backends: tokens joined by spaces.
pub fn query_text(query: &[Token]) -> String {
    query
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
