//! Normalized line storage for a loaded artifact.

use std::ops::Index;

use crate::normalize::normalize_lines;

/// Normalized, non-empty lines of one artifact. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Normalizes `text` line by line and drops blank lines.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: normalize_lines(text),
        }
    }

    /// Builds a buffer from individual raw lines, normalizing each.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|line| crate::normalize::normalize(line.as_ref()))
                .filter(|line| !line.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Index<usize> for LineBuffer {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.lines[index]
    }
}
