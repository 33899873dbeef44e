use crate::config::CanonicalizeConfig;
use crate::decode::MediaType;
use crate::document::{CanonicalizedDocument, Document};
use crate::error::CanonicalError;
use crate::token::Token;

/// Main entry point for text that is already decoded. Returns a serializable
/// snapshot with canonical text, tokens and the identity hash.
///
/// Whitespace-only input is not an error here; it yields an empty token list
/// and callers decide whether that is acceptable.
pub fn canonicalize(
    doc_id: impl Into<String>,
    input: &str,
    cfg: &CanonicalizeConfig,
) -> Result<CanonicalizedDocument, CanonicalError> {
    let doc = Document::new(doc_id, input, MediaType::PlainText, cfg.clone())?;
    Ok(doc.to_canonicalized())
}

/// A document ID is required for traceability in logs and scores.
pub(crate) fn normalize_doc_id(doc_id: impl Into<String>) -> Result<String, CanonicalError> {
    let doc_id: String = doc_id.into();
    let trimmed = doc_id.trim();
    if trimmed.is_empty() {
        return Err(CanonicalError::MissingDocId);
    }
    if doc_id.len() == trimmed.len() {
        Ok(doc_id)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Canonical text is the token stream joined by single spaces.
pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    let capacity = tokens.iter().map(|t| t.text.len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for token in tokens {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&token.text);
    }
    text
}
