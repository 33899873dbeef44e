use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::CanonicalizeConfig;

/// A normalized token with the UTF-8 byte offsets of its origin in the source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    /// Normalized token text.
    pub text: String,
    /// Byte offset (inclusive) in the source text.
    pub start: usize,
    /// Byte offset (exclusive) in the source text.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Splits `source` into normalized tokens.
///
/// The scan walks extended grapheme clusters so that combining marks and
/// multi-codepoint emoji never straddle a token edge. Offsets always point
/// into `source`, not into the normalized text, so callers can map tokens back
/// to the original substring. Total for any input; empty tokens are dropped.
pub fn tokenize(source: &str, cfg: &CanonicalizeConfig) -> Vec<Token> {
    let graphemes: Vec<(usize, &str)> = source.grapheme_indices(true).collect();
    let mut tokens = Vec::with_capacity(graphemes.len() / 4 + 1);
    let mut current_start: Option<usize> = None;

    for (pos, &(offset, grapheme)) in graphemes.iter().enumerate() {
        if !is_delimiter(grapheme, cfg) {
            current_start.get_or_insert(offset);
            continue;
        }
        // don't -> dont
        if current_start.is_some()
            && is_apostrophe(grapheme)
            && graphemes
                .get(pos + 1)
                .is_some_and(|&(_, next)| !is_delimiter(next, cfg))
        {
            continue;
        }
        if let Some(start) = current_start.take() {
            push_token(&mut tokens, source, start, offset, cfg);
        }
    }

    if let Some(start) = current_start {
        push_token(&mut tokens, source, start, source.len(), cfg);
    }

    tokens
}

fn is_delimiter(grapheme: &str, cfg: &CanonicalizeConfig) -> bool {
    if grapheme.chars().all(char::is_whitespace) {
        return true;
    }
    cfg.strip_punctuation && !grapheme.chars().any(char::is_alphanumeric)
}

fn is_apostrophe(grapheme: &str) -> bool {
    matches!(grapheme, "'" | "\u{2019}")
}

fn push_token(
    tokens: &mut Vec<Token>,
    source: &str,
    start: usize,
    end: usize,
    cfg: &CanonicalizeConfig,
) {
    let text = normalize_token(&source[start..end], cfg);
    if !text.is_empty() {
        tokens.push(Token { text, start, end });
    }
}

fn normalize_token(raw: &str, cfg: &CanonicalizeConfig) -> String {
    let mut text: Cow<str> = Cow::Borrowed(raw);
    if cfg.normalize_unicode {
        text = Cow::Owned(text.nfkc().collect());
    }
    if cfg.lowercase {
        text = Cow::Owned(text.to_lowercase());
    }
    // NFKC can surface punctuation or spaces (e.g. U+2024 ONE DOT LEADER).
    text.chars()
        .filter(|ch| {
            if cfg.strip_punctuation {
                ch.is_alphanumeric() || ch.is_mark()
            } else {
                !ch.is_whitespace()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn punctuation_and_case_removed() {
        let cfg = CanonicalizeConfig::default();
        let tokens = tokenize("Hello, World! It's 100% fun.", &cfg);
        assert_eq!(texts(&tokens), vec!["hello", "world", "its", "100", "fun"]);
    }

    #[test]
    fn offsets_point_into_source() {
        let cfg = CanonicalizeConfig::default();
        let source = "  Don\u{2019}t PANIC!";
        let tokens = tokenize(source, &cfg);
        assert_eq!(texts(&tokens), vec!["dont", "panic"]);
        assert_eq!(&source[tokens[0].start..tokens[0].end], "Don\u{2019}t");
        assert_eq!(&source[tokens[1].start..tokens[1].end], "PANIC");
    }

    #[test]
    fn trailing_apostrophe_splits() {
        let cfg = CanonicalizeConfig::default();
        let tokens = tokenize("the students' work", &cfg);
        assert_eq!(texts(&tokens), vec!["the", "students", "work"]);
    }

    #[test]
    fn composed_and_decomposed_forms_match() {
        let cfg = CanonicalizeConfig::default();
        let a = tokenize("Caf\u{00E9}", &cfg);
        let b = tokenize("Cafe\u{0301}", &cfg);
        assert_eq!(texts(&a), texts(&b));
    }

    #[test]
    fn non_bmp_offsets_stable() {
        let cfg = CanonicalizeConfig::default();
        let source = " a\u{10348}b  c ";
        let tokens = tokenize(source, &cfg);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].start, 1);
        assert_eq!(tokens[0].end, 1 + "a\u{10348}b".len());
        assert_eq!(tokens[1].text, "c");
    }

    #[test]
    fn keep_punctuation_when_disabled() {
        let cfg = CanonicalizeConfig {
            strip_punctuation: false,
            ..Default::default()
        };
        let tokens = tokenize("Hello, world!", &cfg);
        assert_eq!(texts(&tokens), vec!["hello,", "world!"]);
    }

    #[test]
    fn only_punctuation_yields_nothing() {
        let cfg = CanonicalizeConfig::default();
        assert!(tokenize(" ... !!! -- ", &cfg).is_empty());
        assert!(tokenize("", &cfg).is_empty());
    }
}
