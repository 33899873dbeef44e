//! Document types.
//!
//! [`Document`] is the working type: decoded source text plus a token
//! sequence that is computed on first use and cached. It is immutable once
//! built, so a single instance can be shared across concurrent sentence
//! evaluations.
//!
//! [`CanonicalizedDocument`] is a plain, serializable snapshot of the same
//! information for callers that want to persist or log it.
//!
//! ```rust
//! use canonical::{CanonicalizeConfig, Document, MediaType};
//!
//! let doc = Document::new(
//!     "doc-001",
//!     "Hello, World!",
//!     MediaType::PlainText,
//!     CanonicalizeConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(doc.canonical_text(), "hello world");
//! assert_eq!(doc.tokens()[1].text, "world");
//! assert_eq!(doc.identity_hash().len(), 64);
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::{CanonicalizeConfig, SegmentConfig};
use crate::decode::{decode, MediaType};
use crate::error::CanonicalError;
use crate::hash::hash_canonical_bytes;
use crate::pipeline::{join_tokens, normalize_doc_id};
use crate::segment::Sentences;
use crate::token::{tokenize, Token};

/// Decoded text plus its lazily derived token sequence.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    media_type: MediaType,
    source: String,
    config: CanonicalizeConfig,
    tokens: OnceLock<Vec<Token>>,
}

impl Document {
    /// Wraps already decoded text.
    ///
    /// Fails with [`CanonicalError::InvalidConfig`] for version 0 and with
    /// [`CanonicalError::MissingDocId`] for a blank id.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        media_type: MediaType,
        config: CanonicalizeConfig,
    ) -> Result<Self, CanonicalError> {
        config.validate()?;
        let id = normalize_doc_id(id)?;
        Ok(Self {
            id,
            media_type,
            source: source.into(),
            config,
            tokens: OnceLock::new(),
        })
    }

    /// Decodes `bytes` according to `media_type` and wraps the result.
    pub fn from_bytes(
        id: impl Into<String>,
        bytes: &[u8],
        media_type: MediaType,
        config: CanonicalizeConfig,
    ) -> Result<Self, CanonicalError> {
        config.validate()?;
        let source = decode(bytes, &media_type)?;
        Self::new(id, source, media_type, config)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// The decoded text every token and sentence offset refers to.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &CanonicalizeConfig {
        &self.config
    }

    /// Tokens in source order. Computed once; later calls return the cache.
    pub fn tokens(&self) -> &[Token] {
        self.tokens
            .get_or_init(|| tokenize(&self.source, &self.config))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    /// Tokens joined by single spaces.
    pub fn canonical_text(&self) -> String {
        join_tokens(self.tokens())
    }

    /// Version-aware SHA-256 of [`Document::canonical_text`].
    pub fn identity_hash(&self) -> String {
        hash_canonical_bytes(self.config.version, self.canonical_text().as_bytes())
    }

    /// Lazily splits the document into sentences.
    ///
    /// The iterator is `Clone` and calling this again restarts from the
    /// beginning with an identical sequence.
    pub fn sentences<'a>(&'a self, cfg: &'a SegmentConfig) -> Sentences<'a> {
        Sentences::new(self, cfg)
    }

    pub fn to_canonicalized(&self) -> CanonicalizedDocument {
        let canonical_text = self.canonical_text();
        let sha256_hex = hash_canonical_bytes(self.config.version, canonical_text.as_bytes());
        CanonicalizedDocument {
            doc_id: self.id.clone(),
            canonical_text,
            tokens: self.tokens().to_vec(),
            sha256_hex,
            canonical_version: self.config.version,
            config: self.config.clone(),
        }
    }
}

/// Serializable snapshot of a canonicalized document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizedDocument {
    /// Application-level document identifier.
    pub doc_id: String,
    /// Tokens joined by single spaces.
    pub canonical_text: String,
    /// Tokens with byte offsets into the original input.
    pub tokens: Vec<Token>,
    /// `SHA-256(version.to_be_bytes() || 0x00 || canonical_text_bytes)`.
    pub sha256_hex: String,
    pub canonical_version: u32,
    /// Snapshot of the configuration that produced this document.
    pub config: CanonicalizeConfig,
}
