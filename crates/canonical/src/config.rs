//! Configuration types for normalization and sentence segmentation.
//!
//! [`CanonicalizeConfig`] controls how raw text is turned into comparable
//! tokens. [`SegmentConfig`] controls where sentence boundaries fall.
//!
//! # Versioning
//!
//! The `version` field is part of every identity hash. Any change to
//! tokenization behavior must be accompanied by a version bump so that
//! hashes produced under different rules never collide.
//!
//! # Examples
//!
//! ```rust
//! use canonical::{CanonicalizeConfig, SegmentConfig};
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.normalize_unicode);
//! assert!(config.strip_punctuation);
//! assert!(config.lowercase);
//!
//! let segment = SegmentConfig::default();
//! assert!(segment.terminals.contains(&'.'));
//! assert!(segment.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the normalizer.
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": true,
///   "strip_punctuation": true,
///   "lowercase": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanonicalizeConfig {
    /// Version of the tokenization rules. Must be >= 1; version 0 is reserved.
    ///
    /// Included in the document identity hash:
    /// ```text
    /// SHA-256(version.to_be_bytes() || 0x00 || canonical_text_bytes)
    /// ```
    pub version: u32,

    /// Apply Unicode NFKC normalization to every token.
    ///
    /// With normalization enabled the composed `"Caf\u{00E9}"` and the
    /// decomposed `"Cafe\u{0301}"` produce the same token, and compatibility
    /// forms such as full-width digits fold to their ASCII equivalents.
    pub normalize_unicode: bool,

    /// Treat punctuation and symbols as token delimiters.
    ///
    /// An apostrophe between two word characters is dropped without
    /// splitting, so `"don't"` becomes the single token `"dont"`:
    /// ```text
    /// "Hello, world! Don't stop." -> ["hello", "world", "dont", "stop"]
    /// ```
    pub strip_punctuation: bool,

    /// Apply locale-free Unicode lowercasing.
    pub lowercase: bool,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            strip_punctuation: true,
            lowercase: true,
        }
    }
}

impl CanonicalizeConfig {
    /// Rejects configurations that cannot produce versioned output.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Sentence boundary rules.
///
/// A boundary is a terminal mark, optionally followed by more terminals and
/// closing quotes or brackets, followed by whitespace or the end of the text.
/// A `.` that ends one of `abbreviations` is not a boundary unless it is the
/// last character of the text. A blank line always ends a sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SegmentConfig {
    /// Characters that can end a sentence.
    pub terminals: Vec<char>,
    /// Lower-case abbreviations, each including its trailing period.
    pub abbreviations: Vec<String>,
}

const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "e.g.", "i.e.", "etc.",
    "fig.",
];

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            terminals: vec!['.', '!', '?', '\u{2026}'],
            abbreviations: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|abbr| (*abbr).to_string())
                .collect(),
        }
    }
}

impl SegmentConfig {
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.terminals.is_empty() {
            return Err(CanonicalError::InvalidConfig(
                "segment terminals must not be empty".into(),
            ));
        }
        if self.terminals.iter().any(|c| c.is_whitespace()) {
            return Err(CanonicalError::InvalidConfig(
                "segment terminals must not contain whitespace".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn is_terminal(&self, ch: char) -> bool {
        self.terminals.contains(&ch)
    }

    pub(crate) fn is_abbreviation(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        self.abbreviations
            .iter()
            .any(|abbr| abbr.eq_ignore_ascii_case(&lowered))
    }
}
