//! Whitespace normalization for display text.
//!
//! Sentence substrings keep the source's original spacing, which can include
//! line breaks from PDF or DOCX extraction. [`collapse_whitespace`] turns them
//! into single-line strings suitable for a JSON response.

/// Collapses every run of Unicode whitespace into one ASCII space and trims
/// both edges.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  hello \n\t world  "), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t  "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
