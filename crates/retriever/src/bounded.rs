use std::time::Duration;

use async_trait::async_trait;
use canonical::Token;
use tracing::warn;

use crate::{Candidate, CandidateRetriever, RetrievalError};

/// Wraps a retriever with a per-call timeout.
///
/// A call that outlives `timeout` is dropped and reported as
/// [`RetrievalError::Timeout`].
#[derive(Debug, Clone)]
pub struct BoundedRetriever<R> {
    inner: R,
    timeout: Duration,
}

impl<R> BoundedRetriever<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: CandidateRetriever> CandidateRetriever for BoundedRetriever<R> {
    async fn retrieve(&self, query: &[Token], k: usize) -> Result<Vec<Candidate>, RetrievalError> {
        match tokio::time::timeout(self.timeout, self.inner.retrieve(query, k)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    retriever = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "retrieval call timed out"
                );
                Err(RetrievalError::Timeout(self.timeout))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
