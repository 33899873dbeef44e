use thiserror::Error;

/// Errors that can occur while decoding or normalizing a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("document requires a non-empty id")]
    MissingDocId,
    #[error("unable to decode content: {0}")]
    Decoding(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}
