//! Line normalization.
//!
//! Dumps and directive text are compared in a canonical form: every run of
//! whitespace becomes a single space and the ends are trimmed. Indentation and
//! column alignment in the generated output therefore never affect a check.

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII whitespace only: space, \t, \n, \x0B, \x0C, \r.
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("whitespace regex is valid"));

/// Collapses whitespace runs to one space and trims both ends.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, " ").trim_matches(' ').to_string()
}

/// Normalizes every line of `text`, dropping lines that end up empty.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. The empty piece between
/// `\r` and `\n` is dropped along with the other blank lines.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}
