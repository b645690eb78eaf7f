//! The directive matcher.
//!
//! A [`DirectiveMatcher`] owns one [`LineBuffer`] and a forward-only cursor.
//! Ordered directives search from the cursor and move it past whatever they
//! consume, so a sequence of calls only succeeds when its matches appear in
//! the same order in the artifact. The `not` directives look at the whole
//! buffer and never touch the cursor.
//!
//! Every call reports immediately. After a failed ordered directive the
//! cursor reflects what was consumed by the failing scan; callers normally
//! stop there.

use tracing::{debug, trace};

use crate::buffer::LineBuffer;
use crate::directive::{Directive, DirectiveKind};
use crate::errors::CheckError;
use crate::pattern::Needle;

#[derive(Debug, Clone)]
pub struct DirectiveMatcher {
    buffer: LineBuffer,
    cursor: usize,
}

impl DirectiveMatcher {
    pub fn new(buffer: LineBuffer) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Convenience for in-memory dumps; normalizes `text` first.
    pub fn from_text(text: &str) -> Self {
        Self::new(LineBuffer::from_text(text))
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Lines not yet consumed by an ordered directive.
    pub fn remaining(&self) -> &[String] {
        &self.buffer.lines()[self.cursor..]
    }

    pub fn check(&mut self, content: &str) -> Result<(), CheckError> {
        self.scan_forward(DirectiveKind::Check, Needle::literal(content))
    }

    pub fn check_next(&mut self, content: &str) -> Result<(), CheckError> {
        self.test_next(DirectiveKind::CheckNext, Needle::literal(content))
    }

    pub fn check_not(&self, content: &str) -> Result<(), CheckError> {
        self.scan_absent(DirectiveKind::CheckNot, Needle::literal(content))
    }

    pub fn check_pattern(&mut self, pattern: &str) -> Result<(), CheckError> {
        let needle = self.compile(DirectiveKind::CheckPattern, pattern)?;
        self.scan_forward(DirectiveKind::CheckPattern, needle)
    }

    pub fn check_next_pattern(&mut self, pattern: &str) -> Result<(), CheckError> {
        let needle = self.compile(DirectiveKind::CheckNextPattern, pattern)?;
        self.test_next(DirectiveKind::CheckNextPattern, needle)
    }

    pub fn check_not_pattern(&self, pattern: &str) -> Result<(), CheckError> {
        let needle = self.compile(DirectiveKind::CheckNotPattern, pattern)?;
        self.scan_absent(DirectiveKind::CheckNotPattern, needle)
    }

    pub fn apply(&mut self, directive: &Directive) -> Result<(), CheckError> {
        let content = directive.content.as_str();
        match directive.kind {
            DirectiveKind::Check => self.check(content),
            DirectiveKind::CheckNext => self.check_next(content),
            DirectiveKind::CheckNot => self.check_not(content),
            DirectiveKind::CheckPattern => self.check_pattern(content),
            DirectiveKind::CheckNextPattern => self.check_next_pattern(content),
            DirectiveKind::CheckNotPattern => self.check_not_pattern(content),
        }
    }

    /// Applies `directives` in order, stopping at the first failure.
    ///
    /// The error carries the index of the failing directive.
    pub fn apply_all(&mut self, directives: &[Directive]) -> Result<(), (usize, CheckError)> {
        for (index, directive) in directives.iter().enumerate() {
            self.apply(directive).map_err(|err| (index, err))?;
        }
        Ok(())
    }

    fn compile(&self, kind: DirectiveKind, pattern: &str) -> Result<Needle, CheckError> {
        Needle::pattern(pattern).map_err(|source| CheckError::InvalidPattern {
            kind,
            content: pattern.to_string(),
            cursor: self.cursor,
            source,
        })
    }

    fn scan_forward(&mut self, kind: DirectiveKind, needle: Needle) -> Result<(), CheckError> {
        let start = self.cursor;
        match needle.find_in(self.remaining()) {
            Some(offset) => {
                self.cursor = start + offset + 1;
                trace!(%kind, content = needle.as_str(), line = start + offset, "matched");
                Ok(())
            }
            None => {
                self.cursor = self.buffer.len();
                debug!(%kind, content = needle.as_str(), from = start, "no match before end of buffer");
                Err(CheckError::DirectiveNotFound {
                    kind,
                    content: needle.as_str().to_string(),
                    cursor: start,
                })
            }
        }
    }

    fn test_next(&mut self, kind: DirectiveKind, needle: Needle) -> Result<(), CheckError> {
        let at = self.cursor;
        let Some(line) = self.buffer.get(at) else {
            debug!(%kind, content = needle.as_str(), "buffer exhausted");
            return Err(CheckError::DirectiveNotFound {
                kind,
                content: needle.as_str().to_string(),
                cursor: at,
            });
        };
        // The line is consumed whether or not it matches.
        self.cursor += 1;
        if needle.is_match(line) {
            trace!(%kind, content = needle.as_str(), line = at, "matched");
            return Ok(());
        }
        debug!(%kind, content = needle.as_str(), line = at, actual = line, "mismatch");
        Err(CheckError::DirectiveMismatch {
            kind,
            content: needle.as_str().to_string(),
            cursor: at,
            line: line.to_string(),
        })
    }

    fn scan_absent(&self, kind: DirectiveKind, needle: Needle) -> Result<(), CheckError> {
        match needle.find_in(self.buffer.lines()) {
            None => Ok(()),
            Some(line_index) => {
                debug!(%kind, content = needle.as_str(), line = line_index, "forbidden content present");
                Err(CheckError::UnexpectedMatch {
                    kind,
                    content: needle.as_str().to_string(),
                    cursor: self.cursor,
                    line_index,
                    line: self.buffer[line_index].to_string(),
                })
            }
        }
    }
}
