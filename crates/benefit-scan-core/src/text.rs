//! Text processing utilities.
//!
//! Provides word tokenization and paragraph joining for the matcher and the
//! document reader.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for a run of word characters (Unicode letters, digits, underscore).
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Lowercase `text` and extract its word tokens in order.
///
/// Word boundaries follow Unicode word semantics, so Cyrillic and Latin
/// scripts tokenize the same way. Punctuation is dropped; hyphenated words
/// split into their parts.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Join paragraph strings into one body separated by single spaces.
pub fn join_paragraphs<I, S>(paragraphs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, p) in paragraphs.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(p.as_ref());
    }
    out
}
