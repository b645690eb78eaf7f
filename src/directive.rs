//! Directive values.
//!
//! A directive is one verification instruction. Ordered kinds (`check`,
//! `check-next` and their pattern forms) move the matcher cursor; the `not`
//! kinds scan the whole buffer and leave the cursor alone.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Check,
    CheckNext,
    CheckNot,
    CheckPattern,
    CheckNextPattern,
    CheckNotPattern,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 6] = [
        DirectiveKind::Check,
        DirectiveKind::CheckNext,
        DirectiveKind::CheckNot,
        DirectiveKind::CheckPattern,
        DirectiveKind::CheckNextPattern,
        DirectiveKind::CheckNotPattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Check => "check",
            DirectiveKind::CheckNext => "check-next",
            DirectiveKind::CheckNot => "check-not",
            DirectiveKind::CheckPattern => "check-pattern",
            DirectiveKind::CheckNextPattern => "check-next-pattern",
            DirectiveKind::CheckNotPattern => "check-not-pattern",
        }
    }

    /// Content is a regular expression rather than a literal.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            DirectiveKind::CheckPattern
                | DirectiveKind::CheckNextPattern
                | DirectiveKind::CheckNotPattern
        )
    }

    /// Reads and advances the cursor.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, DirectiveKind::CheckNot | DirectiveKind::CheckNotPattern)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directive together with its literal or regex text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub content: String,
}

impl Directive {
    pub fn new(kind: DirectiveKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn check(content: impl Into<String>) -> Self {
        Self::new(DirectiveKind::Check, content)
    }

    pub fn check_next(content: impl Into<String>) -> Self {
        Self::new(DirectiveKind::CheckNext, content)
    }

    pub fn check_not(content: impl Into<String>) -> Self {
        Self::new(DirectiveKind::CheckNot, content)
    }

    pub fn check_pattern(content: impl Into<String>) -> Self {
        Self::new(DirectiveKind::CheckPattern, content)
    }

    pub fn check_next_pattern(content: impl Into<String>) -> Self {
        Self::new(DirectiveKind::CheckNextPattern, content)
    }

    pub fn check_not_pattern(content: impl Into<String>) -> Self {
        Self::new(DirectiveKind::CheckNotPattern, content)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.content)
    }
}
