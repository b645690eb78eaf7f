//! Dumpcheck error handling.
//!
//! Every failure mode is a `thiserror` enum that also derives
//! `miette::Diagnostic`, so the CLI can render any of them with a stable code
//! and an optional help line. Errors are grouped by the stage that raises
//! them: artifact resolution, directive evaluation, signature encoding, script
//! loading and configuration. [`DumpcheckError`] wraps them all for callers
//! that do not care which stage failed.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::directive::DirectiveKind;
use crate::locate::Variant;

// ============================================================================
// ARTIFACT RESOLUTION
// ============================================================================

/// Raised while resolving and loading an artifact from a dump directory.
#[derive(Debug, Error, Diagnostic)]
pub enum LocateError {
    #[error("dump directory not found: {}", .path.display())]
    #[diagnostic(
        code(dumpcheck::locate::directory_not_found),
        help("run the compiler with IR dumping enabled before checking, or pass --dir")
    )]
    DirectoryNotFound { path: PathBuf },

    #[error("dump path is not a directory: {}", .path.display())]
    #[diagnostic(code(dumpcheck::locate::not_a_directory))]
    NotADirectory { path: PathBuf },

    #[error("no {variant} artifact matching '{prefix}*' in {}", .directory.display())]
    #[diagnostic(
        code(dumpcheck::locate::no_match),
        help("check the owner, member and signature; `dumpcheck locate` lists what is on disk")
    )]
    NoMatchingArtifact {
        directory: PathBuf,
        prefix: String,
        variant: Variant,
    },

    #[error("artifact index {index} out of range: only {count} {variant} artifact(s) match '{prefix}*'")]
    #[diagnostic(code(dumpcheck::locate::index_out_of_range))]
    IndexOutOfRange {
        prefix: String,
        variant: Variant,
        index: usize,
        count: usize,
    },

    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(dumpcheck::locate::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// DIRECTIVE EVALUATION
// ============================================================================

/// Raised by a single directive against a loaded line buffer.
///
/// `cursor` is the matcher position when the directive was issued.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    #[error("{kind}: \"{content}\" not found (searched from line {cursor})")]
    #[diagnostic(code(dumpcheck::check::not_found))]
    DirectiveNotFound {
        kind: DirectiveKind,
        content: String,
        cursor: usize,
    },

    #[error("{kind}: \"{content}\" does not match line {cursor}: \"{line}\"")]
    #[diagnostic(code(dumpcheck::check::mismatch))]
    DirectiveMismatch {
        kind: DirectiveKind,
        content: String,
        cursor: usize,
        line: String,
    },

    #[error("{kind}: \"{content}\" unexpectedly found on line {line_index}: \"{line}\"")]
    #[diagnostic(code(dumpcheck::check::unexpected_match))]
    UnexpectedMatch {
        kind: DirectiveKind,
        content: String,
        cursor: usize,
        line_index: usize,
        line: String,
    },

    #[error("{kind}: invalid regular expression \"{content}\"")]
    #[diagnostic(
        code(dumpcheck::check::invalid_pattern),
        help("patterns use Rust `regex` syntax; escape literal parentheses as \\(")
    )]
    InvalidPattern {
        kind: DirectiveKind,
        content: String,
        cursor: usize,
        #[source]
        source: regex::Error,
    },
}

impl CheckError {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            CheckError::DirectiveNotFound { kind, .. }
            | CheckError::DirectiveMismatch { kind, .. }
            | CheckError::UnexpectedMatch { kind, .. }
            | CheckError::InvalidPattern { kind, .. } => *kind,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            CheckError::DirectiveNotFound { content, .. }
            | CheckError::DirectiveMismatch { content, .. }
            | CheckError::UnexpectedMatch { content, .. }
            | CheckError::InvalidPattern { content, .. } => content,
        }
    }

    pub fn cursor(&self) -> usize {
        match self {
            CheckError::DirectiveNotFound { cursor, .. }
            | CheckError::DirectiveMismatch { cursor, .. }
            | CheckError::UnexpectedMatch { cursor, .. }
            | CheckError::InvalidPattern { cursor, .. } => *cursor,
        }
    }

    /// The artifact line involved in the failure, if there was one.
    pub fn offending_line(&self) -> Option<&str> {
        match self {
            CheckError::DirectiveMismatch { line, .. } | CheckError::UnexpectedMatch { line, .. } => {
                Some(line)
            }
            _ => None,
        }
    }
}

// ============================================================================
// SIGNATURES
// ============================================================================

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("unknown type name '{name}'")]
    #[diagnostic(
        code(dumpcheck::signature::unknown_type),
        help("use a primitive keyword (int, long, ...), void, or a dotted class name such as java.lang.String")
    )]
    UnknownType { name: String },

    #[error("'void' is only valid as a return type")]
    #[diagnostic(code(dumpcheck::signature::void_parameter))]
    VoidParameter,

    #[error("malformed type descriptor '{descriptor}' at offset {offset}")]
    #[diagnostic(code(dumpcheck::signature::malformed_descriptor))]
    MalformedDescriptor { descriptor: String, offset: usize },
}

// ============================================================================
// SCRIPTS AND CONFIGURATION
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum ScriptError {
    #[error("failed to read check script {}", .path.display())]
    #[diagnostic(code(dumpcheck::script::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse check script {}", .path.display())]
    #[diagnostic(code(dumpcheck::script::yaml))]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("case '{case}': check #{index} must contain exactly one directive, found {found}")]
    #[diagnostic(
        code(dumpcheck::script::invalid_directive),
        help("each entry looks like `- check: \"text\"`; valid keys are check, check_next, check_not, check_pattern, check_next_pattern, check_not_pattern")
    )]
    InvalidDirective {
        case: String,
        index: usize,
        found: usize,
    },

    #[error("case '{case}': {reason}")]
    #[diagnostic(code(dumpcheck::script::invalid_target))]
    InvalidTarget { case: String, reason: String },

    #[error("case '{case}': invalid signature")]
    #[diagnostic(code(dumpcheck::script::signature))]
    Signature {
        case: String,
        #[source]
        #[diagnostic_source]
        source: SignatureError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("optimized suffix '{optimized}' must end with primary suffix '{primary}' and be longer")]
    #[diagnostic(
        code(dumpcheck::config::invalid_suffixes),
        help("the defaults are '.ll' and '-optimized.ll'")
    )]
    InvalidSuffixes { primary: String, optimized: String },
}

// ============================================================================
// UMBRELLA
// ============================================================================

/// Any dumpcheck failure.
#[derive(Debug, Error, Diagnostic)]
pub enum DumpcheckError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to walk {}", .path.display())]
    #[diagnostic(code(dumpcheck::discover::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write report")]
    #[diagnostic(code(dumpcheck::report::io))]
    Report(#[from] std::io::Error),
}

pub type Result<T, E = DumpcheckError> = std::result::Result<T, E>;
