//! Matching primitives shared by every directive.

use regex::Regex;

use crate::normalize::normalize;

/// What a directive looks for in a line.
#[derive(Debug, Clone)]
pub enum Needle {
    /// Substring containment against normalized text.
    Literal(String),
    /// Unanchored regular expression search.
    Pattern(Regex),
}

impl Needle {
    pub fn literal(content: &str) -> Self {
        Needle::Literal(normalize(content))
    }

    /// Compiles `content` after normalizing it, like literal text.
    ///
    /// Collapsing a run can broaden a quantified pattern: `"a  ?b"` becomes
    /// `"a ?b"`, which also matches `"ab"`.
    pub fn pattern(content: &str) -> Result<Self, regex::Error> {
        Regex::new(&normalize(content)).map(Needle::Pattern)
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Needle::Literal(text) => line.contains(text.as_str()),
            Needle::Pattern(re) => re.is_match(line),
        }
    }

    /// Index of the first line in `lines` that matches.
    pub fn find_in<S: AsRef<str>>(&self, lines: &[S]) -> Option<usize> {
        lines.iter().position(|line| self.is_match(line.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Needle::Literal(text) => text,
            Needle::Pattern(re) => re.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_normalized_before_matching() {
        let needle = Needle::literal("  to   label ");
        assert_eq!(needle.as_str(), "to label");
        assert!(needle.is_match("invoke void @f() to label %bb unwind label %lp"));
    }

    #[test]
    fn empty_literal_matches_any_line() {
        assert!(Needle::literal("   ").is_match("entry:"));
    }

    #[test]
    fn pattern_search_is_unanchored() {
        let needle = Needle::pattern(r"%[0-9]+ seq_cst").unwrap();
        assert!(needle.is_match("load atomic i8, ptr addrspace(1) %12 seq_cst, align 1"));
        assert!(!needle.is_match("load atomic i8, ptr addrspace(1) %x seq_cst, align 1"));
    }

    #[test]
    fn literal_does_not_interpret_regex_syntax() {
        let needle = Needle::literal("addrspace(1)");
        assert!(needle.is_match("ptr addrspace(1) %addr"));
        assert!(!Needle::literal("%[0-9]+").is_match("%0 = add i32 1, 2"));
    }

    #[test]
    fn pattern_whitespace_runs_are_collapsed() {
        let needle = Needle::pattern("a  ?b").unwrap();
        assert_eq!(needle.as_str(), "a ?b");
        assert!(needle.is_match("ab"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(Needle::pattern("addrspace(1").is_err());
    }

    #[test]
    fn find_in_returns_first_hit() {
        let lines = ["entry:", "ret void", "ret void"];
        assert_eq!(Needle::literal("ret").find_in(&lines), Some(1));
        assert_eq!(Needle::literal("br").find_in(&lines), None);
    }
}
