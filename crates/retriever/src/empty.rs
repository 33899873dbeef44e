use async_trait::async_trait;
use canonical::Token;

use crate::{Candidate, CandidateRetriever, RetrievalError};

/// Retriever with no sources. Every query yields zero candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRetriever;

#[async_trait]
impl CandidateRetriever for EmptyRetriever {
    async fn retrieve(&self, _query: &[Token], _k: usize) -> Result<Vec<Candidate>, RetrievalError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "empty"
    }
}
