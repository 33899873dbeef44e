//! simcheck canonical text layer.
//!
//! Turns uploaded bytes and raw strings into comparable units: decoded text,
//! normalized tokens that remember where they came from, and sentences.
//!
//! ## What we do
//!
//! - Decode plain text (UTF-8, UTF-16 with BOM), PDF, DOCX and HTML
//! - Tokenize with NFKC normalization, lowercasing and punctuation stripping
//! - Keep byte offsets into the decoded source for every token
//! - Segment into sentences lazily, with an abbreviation guard
//! - Version-aware identity hashes
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. The same bytes and config
//! produce the same tokens and sentences on any machine.
//!
//! ```rust
//! use canonical::{CanonicalizeConfig, Document, MediaType, SegmentConfig};
//!
//! let doc = Document::from_bytes(
//!     "essay.txt",
//!     b"Mr. Smith wrote this. It's short!",
//!     MediaType::PlainText,
//!     CanonicalizeConfig::default(),
//! )
//! .unwrap();
//!
//! let segment = SegmentConfig::default();
//! let sentences: Vec<_> = doc.sentences(&segment).collect();
//! assert_eq!(sentences.len(), 2);
//! assert_eq!(sentences[1].text, "It's short!");
//! ```

mod config;
mod decode;
mod document;
mod error;
mod hash;
mod pipeline;
pub mod segment;
mod token;
mod whitespace;

pub use crate::config::{CanonicalizeConfig, SegmentConfig};
pub use crate::decode::{decode, MediaType, MIME_DOCX};
pub use crate::document::{CanonicalizedDocument, Document};
pub use crate::error::CanonicalError;
pub use crate::hash::{hash_canonical_bytes, hash_text};
pub use crate::pipeline::canonicalize;
pub use crate::segment::{Sentence, Sentences};
pub use crate::token::{tokenize, Token};
pub use crate::whitespace::collapse_whitespace;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_canonicalize_default() {
        let input = "  HAcllo\nWORLD!  This is   simcheck. ";
        let cfg = CanonicalizeConfig::default();
        let out = canonicalize("doc-basic", input, &cfg).expect("canonicalization succeeds");

        assert_eq!(out.canonical_text, "hacllo world this is simcheck");
        assert_eq!(out.doc_id, "doc-basic");
        assert_eq!(out.canonical_version, cfg.version);
        assert_eq!(out.config, cfg);

        let expected = [
            ("hacllo", 2usize, 8usize),
            ("world", 9, 14),
            ("this", 17, 21),
            ("is", 22, 24),
            ("simcheck", 27, 35),
        ];
        assert_eq!(out.tokens.len(), expected.len());
        for (token, (text, start, end)) in out.tokens.iter().zip(expected) {
            assert_eq!(token.text, text);
            assert_eq!(token.start, start);
            assert_eq!(token.end, end);
            assert_eq!(input[start..end].to_lowercase(), text);
        }

        let expected_hash =
            hash_canonical_bytes(out.canonical_version, out.canonical_text.as_bytes());
        assert_eq!(out.sha256_hex, expected_hash);
    }

    #[test]
    fn unicode_equivalence_nfkc() {
        let cfg = CanonicalizeConfig::default();
        let doc_a = canonicalize("doc-a", "Caf\u{00E9}", &cfg).expect("composed");
        let doc_b = canonicalize("doc-b", "Cafe\u{0301}", &cfg).expect("decomposed");

        assert_eq!(doc_a.canonical_text, doc_b.canonical_text);
        assert_eq!(doc_a.sha256_hex, doc_b.sha256_hex);
    }

    #[test]
    fn whitespace_only_input_yields_no_tokens() {
        let cfg = CanonicalizeConfig::default();
        let doc = canonicalize("blank", "   \n\t ", &cfg).expect("blank input is allowed");
        assert!(doc.tokens.is_empty());
        assert_eq!(doc.canonical_text, "");
    }

    #[test]
    fn missing_doc_id_rejected() {
        let cfg = CanonicalizeConfig::default();
        let res = canonicalize("  ", "content", &cfg);
        assert!(matches!(res, Err(CanonicalError::MissingDocId)));
    }

    #[test]
    fn doc_id_trimmed() {
        let cfg = CanonicalizeConfig::default();
        let doc = canonicalize(" padded ", "content", &cfg).expect("canonicalize");
        assert_eq!(doc.doc_id, "padded");
    }

    #[test]
    fn disable_unicode_normalization() {
        let cfg = CanonicalizeConfig {
            normalize_unicode: false,
            ..Default::default()
        };
        let doc = canonicalize("doc-raw", "Cafe\u{0301}", &cfg).expect("canonicalization succeeds");
        assert_eq!(doc.canonical_text, "cafe\u{0301}");
    }

    #[test]
    fn invalid_config_version_rejected() {
        let cfg = CanonicalizeConfig {
            version: 0,
            ..Default::default()
        };
        let res = canonicalize("doc-invalid", "content", &cfg);
        assert!(matches!(res, Err(CanonicalError::InvalidConfig(_))));
    }

    #[test]
    fn canonical_hash_includes_version() {
        let cfg_v1 = CanonicalizeConfig::default();
        let cfg_v2 = CanonicalizeConfig {
            version: cfg_v1.version + 1,
            ..CanonicalizeConfig::default()
        };

        let doc_v1 = canonicalize("doc", "Same text", &cfg_v1).expect("v1");
        let doc_v2 = canonicalize("doc", "Same text", &cfg_v2).expect("v2");

        assert_eq!(doc_v1.canonical_text, doc_v2.canonical_text);
        assert_ne!(doc_v1.sha256_hex, doc_v2.sha256_hex);
    }

    #[test]
    fn document_tokens_cached_and_cloned() {
        let doc = Document::new(
            "doc",
            "alpha beta",
            MediaType::PlainText,
            CanonicalizeConfig::default(),
        )
        .expect("document");
        let first = doc.tokens().as_ptr();
        assert_eq!(doc.tokens().as_ptr(), first);
        let copy = doc.clone();
        assert_eq!(copy.tokens(), doc.tokens());
        assert_eq!(copy.identity_hash(), doc.identity_hash());
    }

    #[test]
    fn from_bytes_propagates_decoding_errors() {
        let res = Document::from_bytes(
            "bad",
            &[0xc3, 0x28],
            MediaType::PlainText,
            CanonicalizeConfig::default(),
        );
        assert!(matches!(res, Err(CanonicalError::Decoding(_))));
    }
}
