//! SHA-256 helpers for document identity.
//!
//! ```text
//! identity = SHA-256(version.to_be_bytes() || 0x00 || canonical_text_bytes)
//! ```
//!
//! The version prefix keeps hashes produced under different tokenization
//! rules distinct even when the canonical text happens to match.
//!
//! ```rust
//! use canonical::{hash_canonical_bytes, hash_text};
//!
//! assert_eq!(hash_text("hello world").len(), 64);
//! assert_ne!(
//!     hash_canonical_bytes(1, b"hello world"),
//!     hash_canonical_bytes(2, b"hello world"),
//! );
//! ```

use sha2::{Digest, Sha256};

/// Hash arbitrary text with SHA-256 and return a hex digest.
///
/// Version-agnostic; suited to log fields and diagnostics. Use
/// [`hash_canonical_bytes`] for document identity.
pub fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the version-aware identity hash of canonical text.
pub fn hash_canonical_bytes(canonical_version: u32, canonical_bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_version.to_be_bytes());
    hasher.update([0]);
    hasher.update(canonical_bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_text_is_deterministic() {
        for text in ["", "hello world", "\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}", "emoji \u{1f600}"] {
            assert_eq!(hash_text(text), hash_text(text));
        }
    }

    #[test]
    fn identity_hash_differs_from_plain_hash() {
        assert_ne!(hash_text("abc"), hash_canonical_bytes(1, b"abc"));
    }
}
