use canonical::CanonicalError;
use keywords::KeywordError;
use matcher::MatchError;
use perceptual::SimilarityError;
use retriever::RetrievalError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Request-level failures of the [`crate::Engine`].
///
/// Retrieval problems and deadline expiry never appear here: they degrade
/// single sentences of a plagiarism report instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Missing or conflicting input.
    #[error("{0}")]
    Validation(String),
    /// The bytes could not be turned into text.
    #[error("unable to decode {name}: {reason}")]
    Decoding { name: String, reason: String },
    #[error("unsupported file type for {name}: {media_type}")]
    UnsupportedMediaType { name: String, media_type: String },
    /// No tokens where the operation needs some.
    #[error("{0}")]
    EmptyInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Maps a decoding-stage error for the input called `name`.
    pub(crate) fn from_canonical(name: &str, err: CanonicalError) -> Self {
        match err {
            CanonicalError::Decoding(reason) => EngineError::Decoding {
                name: name.to_string(),
                reason,
            },
            CanonicalError::UnsupportedMediaType(media_type) => {
                EngineError::UnsupportedMediaType {
                    name: name.to_string(),
                    media_type,
                }
            }
            CanonicalError::MissingDocId => {
                EngineError::Validation(format!("{name} requires a name"))
            }
            CanonicalError::InvalidConfig(msg) => EngineError::Config(msg),
        }
    }
}

impl From<ConfigLoadError> for EngineError {
    fn from(value: ConfigLoadError) -> Self {
        EngineError::Config(value.to_string())
    }
}

impl From<SimilarityError> for EngineError {
    fn from(value: SimilarityError) -> Self {
        EngineError::Config(value.to_string())
    }
}

impl From<MatchError> for EngineError {
    fn from(value: MatchError) -> Self {
        EngineError::Config(value.to_string())
    }
}

impl From<RetrievalError> for EngineError {
    fn from(value: RetrievalError) -> Self {
        EngineError::Config(value.to_string())
    }
}

impl From<KeywordError> for EngineError {
    fn from(value: KeywordError) -> Self {
        match value {
            KeywordError::EmptyInput => {
                EngineError::EmptyInput("text has no words to extract keywords from".into())
            }
            KeywordError::InvalidConfig(msg) => EngineError::Config(msg),
        }
    }
}
