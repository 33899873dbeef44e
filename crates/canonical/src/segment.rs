//! Sentence segmentation over a [`Document`].
//!
//! Segmentation is lazy: [`Sentences`] finds one boundary per `next()` call
//! and borrows tokens from the document's cache instead of re-tokenizing.

use serde::{Deserialize, Serialize};

use crate::config::SegmentConfig;
use crate::document::Document;
use crate::token::Token;

const CLOSERS: &[char] = &[
    '"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{00BB}',
];
const OPENERS: &[char] = &[
    '"', '\'', '(', '[', '{', '\u{201C}', '\u{2018}', '\u{00AB}',
];

/// A sentence of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Position among the document's non-empty sentences.
    pub index: usize,
    /// Trimmed original substring.
    pub text: String,
    /// Byte offset (inclusive) in the document source.
    pub start: usize,
    /// Byte offset (exclusive) in the document source.
    pub end: usize,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn token_texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }
}

/// Lazy, restartable iterator over the sentences of a document.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    doc: &'a Document,
    cfg: &'a SegmentConfig,
    cursor: usize,
    index: usize,
}

impl<'a> Sentences<'a> {
    pub(crate) fn new(doc: &'a Document, cfg: &'a SegmentConfig) -> Self {
        Self {
            doc,
            cfg,
            cursor: 0,
            index: 0,
        }
    }
}

impl Iterator for Sentences<'_> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        let source = self.doc.source();
        while self.cursor < source.len() {
            let from = self.cursor;
            let (end, resume) = find_boundary(source, from, self.cfg);
            self.cursor = resume;

            let raw = &source[from..end];
            let start = from + (raw.len() - raw.trim_start().len());
            let end = from + raw.trim_end().len();
            if start >= end {
                continue;
            }

            let tokens = self.doc.tokens();
            let lo = tokens.partition_point(|t| t.start < start);
            let hi = tokens.partition_point(|t| t.start < end);
            if lo == hi {
                continue;
            }

            let sentence = Sentence {
                index: self.index,
                text: source[start..end].to_string(),
                start,
                end,
                tokens: tokens[lo..hi].to_vec(),
            };
            self.index += 1;
            return Some(sentence);
        }
        None
    }
}

/// Returns `(sentence_end, resume_at)` for the sentence starting at `from`.
/// `resume_at` is always past `from`.
fn find_boundary(text: &str, from: usize, cfg: &SegmentConfig) -> (usize, usize) {
    let mut chars = text[from..].char_indices().peekable();

    while let Some((rel, ch)) = chars.next() {
        let pos = from + rel;

        if ch == '\n' {
            if let Some(resume) = paragraph_break(text, pos) {
                return (pos, resume);
            }
            continue;
        }
        if !cfg.is_terminal(ch) {
            continue;
        }

        let mark_end = pos + ch.len_utf8();
        let mut end = mark_end;
        while let Some(&(next_rel, next)) = chars.peek() {
            if !(cfg.is_terminal(next) || CLOSERS.contains(&next)) {
                break;
            }
            end = from + next_rel + next.len_utf8();
            chars.next();
        }

        if end == text.len() {
            return (end, end);
        }
        if !text[end..].starts_with(char::is_whitespace) {
            continue;
        }
        if ch == '.' && end == mark_end && ends_with_abbreviation(&text[from..mark_end], cfg) {
            continue;
        }
        return (end, end);
    }

    (text.len(), text.len())
}

/// A line break followed by whitespace containing another line break.
fn paragraph_break(text: &str, newline: usize) -> Option<usize> {
    let rest = &text[newline + 1..];
    let gap: usize = rest
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    rest[..gap].contains('\n').then_some(newline + 1 + gap)
}

fn ends_with_abbreviation(segment: &str, cfg: &SegmentConfig) -> bool {
    segment
        .split_whitespace()
        .last()
        .map(|word| word.trim_start_matches(OPENERS))
        .is_some_and(|word| cfg.is_abbreviation(word))
}
