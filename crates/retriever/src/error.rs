use std::time::Duration;

use thiserror::Error;

/// Errors from candidate retrieval.
///
/// `Unavailable` and `Timeout` are per-query conditions; callers record the
/// affected sentence as unmatched and carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("retrieval source unavailable: {0}")]
    Unavailable(String),
    #[error("retrieval timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid retriever configuration: {0}")]
    InvalidConfig(String),
}

impl RetrievalError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// True for failures that affect a single query rather than the setup.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}
