//! Check scripts.
//!
//! A check script is a YAML file listing cases. Each case names the method
//! whose dump should be verified and the directives to run against it:
//!
//! ```yaml
//! config:
//!   suffix: ".ll"
//!   optimized_suffix: "-optimized.ll"
//! cases:
//!   - name: "card table barrier"
//!     owner: "compiler.jeandle.TestCardTableBarrier"
//!     member: "testYGC"
//!     params: ["compiler.jeandle.TestCardTableBarrier$OldObject"]
//!     returns: "void"
//!     index: 1
//!     checks:
//!       - check: "define private hotspotcc void @jeandle.card_table_barrier"
//!       - check_next: "entry:"
//!       - check_not: "seq_cst"
//! ```
//!
//! Cases run independently; directives inside a case stop at the first
//! failure.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::directive::{Directive, DirectiveKind};
use crate::errors::{ConfigError, ScriptError};
use crate::locate::{ArtifactLocator, ArtifactQuery, LocatorConfig, Variant};
use crate::signature::MethodSignature;

// =============================================================================
// FILE FORMAT
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptFile {
    #[serde(default)]
    pub config: LocatorConfig,
    #[serde(default)]
    pub cases: Vec<CaseSpec>,
}

/// One case as written in YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseSpec {
    pub name: String,
    pub owner: String,
    pub member: String,
    #[serde(default)]
    pub params: Vec<String>,
    pub returns: Option<String>,
    /// Encoded descriptor, used instead of `params`/`returns`.
    pub signature: Option<String>,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub checks: Vec<DirectiveSpec>,
}

/// A `checks` entry. Exactly one field must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveSpec {
    pub check: Option<String>,
    pub check_next: Option<String>,
    pub check_not: Option<String>,
    pub check_pattern: Option<String>,
    pub check_next_pattern: Option<String>,
    pub check_not_pattern: Option<String>,
}

impl DirectiveSpec {
    fn into_directive(self, case: &str, index: usize) -> Result<Directive, ScriptError> {
        let mut set: Vec<Directive> = [
            (DirectiveKind::Check, self.check),
            (DirectiveKind::CheckNext, self.check_next),
            (DirectiveKind::CheckNot, self.check_not),
            (DirectiveKind::CheckPattern, self.check_pattern),
            (DirectiveKind::CheckNextPattern, self.check_next_pattern),
            (DirectiveKind::CheckNotPattern, self.check_not_pattern),
        ]
        .into_iter()
        .filter_map(|(kind, content)| content.map(|c| Directive::new(kind, c)))
        .collect();

        if set.len() != 1 {
            return Err(ScriptError::InvalidDirective {
                case: case.to_string(),
                index,
                found: set.len(),
            });
        }
        Ok(set.remove(0))
    }
}

impl CaseSpec {
    pub fn resolve(self) -> Result<CheckCase, ScriptError> {
        let descriptor = match (&self.signature, &self.returns) {
            (Some(_), Some(_)) => {
                return Err(ScriptError::InvalidTarget {
                    case: self.name,
                    reason: "give either `signature` or `returns`, not both".to_string(),
                })
            }
            (Some(_), None) if !self.params.is_empty() => {
                return Err(ScriptError::InvalidTarget {
                    case: self.name,
                    reason: "`params` cannot be combined with `signature`".to_string(),
                })
            }
            (Some(raw), None) => MethodSignature::parse_descriptor(raw.trim()),
            (None, Some(ret)) => MethodSignature::from_type_names(self.params.as_slice(), ret),
            (None, None) => {
                return Err(ScriptError::InvalidTarget {
                    case: self.name,
                    reason: "missing `returns` (or an encoded `signature`)".to_string(),
                })
            }
        };
        let signature = descriptor.map_err(|source| ScriptError::Signature {
            case: self.name.clone(),
            source,
        })?;

        let directives = self
            .checks
            .into_iter()
            .enumerate()
            .map(|(i, spec)| spec.into_directive(&self.name, i))
            .collect::<Result<Vec<_>, _>>()?;

        let query = ArtifactQuery::new(self.owner, self.member, &signature)
            .variant(self.variant)
            .index(self.index);

        Ok(CheckCase {
            name: self.name,
            query,
            skip: self.skip,
            directives,
        })
    }
}

// =============================================================================
// LOADED SCRIPTS
// =============================================================================

#[derive(Debug, Clone)]
pub struct CheckCase {
    pub name: String,
    pub query: ArtifactQuery,
    pub skip: bool,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone)]
pub struct CheckScript {
    pub path: PathBuf,
    pub config: LocatorConfig,
    pub cases: Vec<CheckCase>,
}

impl CheckScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parses script text; `path` is only used for reporting.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = serde_yaml::from_str(text).map_err(|source| ScriptError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        file.config.validate()?;
        let cases = file
            .cases
            .into_iter()
            .map(CaseSpec::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            config: file.config,
            cases,
        })
    }

    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Settings shared by every script in a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dump_dir: PathBuf,
    /// Case-insensitive substring a case name must contain.
    pub filter: Option<String>,
    pub suffix: Option<String>,
    pub optimized_suffix: Option<String>,
}

impl RunOptions {
    pub fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_dir: dump_dir.into(),
            ..Self::default()
        }
    }

    /// `base` with any suffix overrides applied.
    pub fn effective_config(&self, base: &LocatorConfig) -> LocatorConfig {
        LocatorConfig {
            primary_suffix: self
                .suffix
                .clone()
                .unwrap_or_else(|| base.primary_suffix.clone()),
            optimized_suffix: self
                .optimized_suffix
                .clone()
                .unwrap_or_else(|| base.optimized_suffix.clone()),
        }
    }

    fn skip_reason(&self, case: &CheckCase) -> Option<String> {
        if case.skip {
            return Some("Marked 'skip'".to_string());
        }
        if let Some(f) = &self.filter {
            if !case.name.to_lowercase().contains(&f.to_lowercase()) {
                return Some(format!("Filtered out by substring: {}", f));
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Pass {
        script: String,
        name: String,
        artifact: PathBuf,
        directives: usize,
    },
    Fail {
        script: String,
        name: String,
        artifact: Option<PathBuf>,
        /// Index of the failing directive; `None` when the artifact could not be loaded.
        directive: Option<usize>,
        error: String,
        expected: Option<String>,
        actual: Option<String>,
    },
    Skipped {
        script: String,
        name: String,
        reason: String,
    },
}

impl CaseOutcome {
    pub fn name(&self) -> &str {
        match self {
            CaseOutcome::Pass { name, .. }
            | CaseOutcome::Fail { name, .. }
            | CaseOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Fail { .. })
    }
}

/// Resolves the case's artifact and applies its directives fail-fast.
pub fn run_case(locator: &ArtifactLocator, dump_dir: &Path, script: &str, case: &CheckCase) -> CaseOutcome {
    let artifact = match locator.resolve(dump_dir, &case.query) {
        Ok(artifact) => artifact,
        Err(err) => {
            warn!(case = %case.name, error = %err, "artifact not loaded");
            return CaseOutcome::Fail {
                script: script.to_string(),
                name: case.name.clone(),
                artifact: None,
                directive: None,
                error: err.to_string(),
                expected: None,
                actual: None,
            };
        }
    };

    let path = artifact.path.clone();
    let mut matcher = artifact.into_matcher();
    match matcher.apply_all(&case.directives) {
        Ok(()) => {
            info!(case = %case.name, artifact = %path.display(), "passed");
            CaseOutcome::Pass {
                script: script.to_string(),
                name: case.name.clone(),
                artifact: path,
                directives: case.directives.len(),
            }
        }
        Err((index, err)) => {
            info!(case = %case.name, directive = index, error = %err, "failed");
            CaseOutcome::Fail {
                script: script.to_string(),
                name: case.name.clone(),
                artifact: Some(path),
                directive: Some(index),
                error: err.to_string(),
                expected: Some(err.content().to_string()),
                actual: err.offending_line().map(str::to_string),
            }
        }
    }
}

/// Runs every case of `script`. Only an invalid suffix configuration aborts.
pub fn run_script(script: &CheckScript, options: &RunOptions) -> Result<Vec<CaseOutcome>, ConfigError> {
    let locator = ArtifactLocator::new(options.effective_config(&script.config))?;
    let name = script.display_name();
    let outcomes = script
        .cases
        .iter()
        .map(|case| match options.skip_reason(case) {
            Some(reason) => CaseOutcome::Skipped {
                script: name.clone(),
                name: case.name.clone(),
                reason,
            },
            None => run_case(&locator, &options.dump_dir, &name, case),
        })
        .collect();
    Ok(outcomes)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<CaseOutcome>,
}

impl RunSummary {
    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = CaseOutcome>) {
        for outcome in outcomes {
            match outcome {
                CaseOutcome::Pass { .. } => self.passed += 1,
                CaseOutcome::Fail { .. } => self.failed += 1,
                CaseOutcome::Skipped { .. } => self.skipped += 1,
            }
            self.outcomes.push(outcome);
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
