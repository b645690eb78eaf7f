//! Artifact resolution.
//!
//! A dump directory holds one file per compilation, named
//! `<owner>_<member>_<signature><suffix>`. Owners use `_` instead of `.`,
//! signatures use `_` instead of `/`, and the suffix tells the primary dump
//! (`.ll`) from the optimized one (`-optimized.ll`). Repeated compilations of
//! the same method produce several files with the same prefix; they are
//! ordered by file name and picked by index.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::buffer::LineBuffer;
use crate::errors::{ConfigError, LocateError};
use crate::matcher::DirectiveMatcher;
use crate::signature::MethodSignature;

pub const DEFAULT_PRIMARY_SUFFIX: &str = ".ll";
pub const DEFAULT_OPTIMIZED_SUFFIX: &str = "-optimized.ll";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Primary,
    Optimized,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Primary => "primary",
            Variant::Optimized => "optimized",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File suffixes that distinguish the two variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocatorConfig {
    #[serde(rename = "suffix")]
    pub primary_suffix: String,
    pub optimized_suffix: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            primary_suffix: DEFAULT_PRIMARY_SUFFIX.to_string(),
            optimized_suffix: DEFAULT_OPTIMIZED_SUFFIX.to_string(),
        }
    }
}

impl LocatorConfig {
    /// The optimized suffix must strictly extend the primary one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optimized_suffix.len() > self.primary_suffix.len()
            && self.optimized_suffix.ends_with(&self.primary_suffix)
        {
            return Ok(());
        }
        Err(ConfigError::InvalidSuffixes {
            primary: self.primary_suffix.clone(),
            optimized: self.optimized_suffix.clone(),
        })
    }

    pub fn matches_variant(&self, file_name: &str, variant: Variant) -> bool {
        match variant {
            Variant::Optimized => file_name.ends_with(&self.optimized_suffix),
            Variant::Primary => {
                file_name.ends_with(&self.primary_suffix)
                    && !file_name.ends_with(&self.optimized_suffix)
            }
        }
    }
}

/// Which artifact to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactQuery {
    /// Dotted owner name, e.g. `compiler.jeandle.TestVolatile`.
    pub owner: String,
    pub member: String,
    /// Encoded descriptor, e.g. `(I)V`.
    pub signature: String,
    pub variant: Variant,
    pub index: usize,
}

impl ArtifactQuery {
    pub fn new(owner: impl Into<String>, member: impl Into<String>, signature: &MethodSignature) -> Self {
        Self::with_descriptor(owner, member, signature.encode())
    }

    /// Uses an already encoded descriptor verbatim.
    pub fn with_descriptor(
        owner: impl Into<String>,
        member: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
            signature: descriptor.into(),
            variant: Variant::Primary,
            index: 0,
        }
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn optimized(self, optimized: bool) -> Self {
        self.variant(if optimized { Variant::Optimized } else { Variant::Primary })
    }

    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// File name prefix shared by every dump of this method.
    pub fn file_prefix(&self) -> String {
        format!(
            "{}_{}_{}",
            self.owner.replace('.', "_"),
            self.member,
            self.signature.replace('/', "_")
        )
    }
}

impl fmt::Display for ArtifactQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}{} [{} #{}]",
            self.owner, self.member, self.signature, self.variant, self.index
        )
    }
}

/// A resolved and loaded dump.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub query: ArtifactQuery,
    pub path: PathBuf,
    pub lines: LineBuffer,
}

impl Artifact {
    pub fn into_matcher(self) -> DirectiveMatcher {
        DirectiveMatcher::new(self.lines)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactLocator {
    config: LocatorConfig,
}

impl ArtifactLocator {
    pub fn new(config: LocatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Every file in `directory` matching `query`'s prefix and variant,
    /// sorted by file name. `query.index` is ignored.
    pub fn candidates(&self, directory: &Path, query: &ArtifactQuery) -> Result<Vec<PathBuf>, LocateError> {
        match fs::metadata(directory) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(LocateError::NotADirectory {
                    path: directory.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LocateError::DirectoryNotFound {
                    path: directory.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(LocateError::Io {
                    path: directory.to_path_buf(),
                    source,
                })
            }
        }

        let prefix = query.file_prefix();
        let mut found: Vec<(String, PathBuf)> = Vec::new();
        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| LocateError::Io {
                path: directory.to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if name.starts_with(&prefix) && self.config.matches_variant(name, query.variant) {
                found.push((name.to_string(), entry.into_path()));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(
            prefix = %prefix,
            variant = %query.variant,
            count = found.len(),
            "collected candidate artifacts"
        );
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    /// Picks the file for `query` without reading it.
    pub fn select(&self, directory: &Path, query: &ArtifactQuery) -> Result<PathBuf, LocateError> {
        let candidates = self.candidates(directory, query)?;
        self.pick(directory, query, candidates)
    }

    /// Applies `query.index` to an already collected candidate list.
    pub fn pick(
        &self,
        directory: &Path,
        query: &ArtifactQuery,
        mut candidates: Vec<PathBuf>,
    ) -> Result<PathBuf, LocateError> {
        if candidates.is_empty() {
            return Err(LocateError::NoMatchingArtifact {
                directory: directory.to_path_buf(),
                prefix: query.file_prefix(),
                variant: query.variant,
            });
        }
        if query.index >= candidates.len() {
            return Err(LocateError::IndexOutOfRange {
                prefix: query.file_prefix(),
                variant: query.variant,
                index: query.index,
                count: candidates.len(),
            });
        }
        Ok(candidates.swap_remove(query.index))
    }

    pub fn resolve(&self, directory: &Path, query: &ArtifactQuery) -> Result<Artifact, LocateError> {
        let path = self.select(directory, query)?;
        self.load(query, path)
    }

    /// Reads and normalizes an artifact that has already been selected.
    pub fn load(&self, query: &ArtifactQuery, path: PathBuf) -> Result<Artifact, LocateError> {
        let text = fs::read_to_string(&path).map_err(|source| LocateError::Io {
            path: path.clone(),
            source,
        })?;
        let lines = LineBuffer::from_text(&text);
        info!(path = %path.display(), lines = lines.len(), "loaded artifact");
        Ok(Artifact {
            query: query.clone(),
            path,
            lines,
        })
    }

    /// Resolves `query` and wraps the artifact in a fresh matcher.
    pub fn locate(&self, directory: &Path, query: &ArtifactQuery) -> Result<DirectiveMatcher, LocateError> {
        self.resolve(directory, query).map(Artifact::into_matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dump_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    fn config(primary: &str, optimized: &str) -> LocatorConfig {
        LocatorConfig {
            primary_suffix: primary.to_string(),
            optimized_suffix: optimized.to_string(),
        }
    }

    #[test]
    fn scenario_c_variant_selection() {
        let dir = dump_dir(&[
            ("Foo_bar_()V.ext", "primary body"),
            ("Foo_bar_()V-optimized.ext", "optimized body"),
        ]);
        let locator = ArtifactLocator::new(config(".ext", "-optimized.ext")).unwrap();
        let query = ArtifactQuery::with_descriptor("Foo", "bar", "()V");

        let primary = locator.resolve(dir.path(), &query).unwrap();
        assert!(primary.path.ends_with("Foo_bar_()V.ext"));
        assert_eq!(primary.lines.lines(), ["primary body"]);

        let optimized = locator
            .resolve(dir.path(), &query.clone().variant(Variant::Optimized))
            .unwrap();
        assert!(optimized.path.ends_with("Foo_bar_()V-optimized.ext"));

        assert_eq!(locator.candidates(dir.path(), &query).unwrap().len(), 1);
    }

    #[test]
    fn scenario_e_index_out_of_range() {
        let dir = dump_dir(&[("Foo_bar_()V-1.ll", "a"), ("Foo_bar_()V-2.ll", "b")]);
        let locator = ArtifactLocator::default();
        let query = ArtifactQuery::with_descriptor("Foo", "bar", "()V").index(5);
        match locator.resolve(dir.path(), &query) {
            Err(LocateError::IndexOutOfRange { index, count, .. }) => {
                assert_eq!(index, 5);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn candidates_are_sorted_by_file_name() {
        let dir = dump_dir(&[
            ("Foo_bar_()V-3.ll", "third"),
            ("Foo_bar_()V-1.ll", "first"),
            ("Foo_bar_()V-2.ll", "second"),
        ]);
        let locator = ArtifactLocator::default();
        let query = ArtifactQuery::with_descriptor("Foo", "bar", "()V");
        for (index, expected) in ["first", "second", "third"].iter().enumerate() {
            let artifact = locator.resolve(dir.path(), &query.clone().index(index)).unwrap();
            assert_eq!(artifact.lines.lines(), [*expected]);
        }
    }

    #[test]
    fn owner_dots_and_signature_slashes_are_sanitized() {
        let sig = MethodSignature::from_type_names(&["java.lang.Throwable"], "void").unwrap();
        let query = ArtifactQuery::new("java.lang.Throwable", "addSuppressed", &sig);
        assert_eq!(
            query.file_prefix(),
            "java_lang_Throwable_addSuppressed_(Ljava_lang_Throwable;)V"
        );
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = ArtifactLocator::default()
            .resolve(&missing, &ArtifactQuery::with_descriptor("A", "b", "()V"))
            .unwrap_err();
        assert!(matches!(err, LocateError::DirectoryNotFound { .. }));
    }

    #[test]
    fn path_is_a_file() {
        let dir = dump_dir(&[("plain.txt", "x")]);
        let err = ArtifactLocator::default()
            .resolve(&dir.path().join("plain.txt"), &ArtifactQuery::with_descriptor("A", "b", "()V"))
            .unwrap_err();
        assert!(matches!(err, LocateError::NotADirectory { .. }));
    }

    #[test]
    fn no_matching_artifact_ignores_other_methods_and_subdirectories() {
        let dir = dump_dir(&[("Foo_baz_()V.ll", "x"), ("Foo_bar_()V.txt", "y")]);
        fs::create_dir(dir.path().join("Foo_bar_()V.ll")).unwrap();
        let err = ArtifactLocator::default()
            .resolve(dir.path(), &ArtifactQuery::with_descriptor("Foo", "bar", "()V"))
            .unwrap_err();
        assert!(matches!(err, LocateError::NoMatchingArtifact { .. }));
    }

    #[test]
    fn resolve_is_deterministic() {
        let dir = dump_dir(&[("Foo_bar_()V-b.ll", "b"), ("Foo_bar_()V-a.ll", "a")]);
        let locator = ArtifactLocator::default();
        let query = ArtifactQuery::with_descriptor("Foo", "bar", "()V");
        let first = locator.resolve(dir.path(), &query).unwrap();
        let second = locator.resolve(dir.path(), &query).unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(first.lines, second.lines);
    }

    #[test]
    fn rejects_suffixes_that_do_not_nest() {
        assert!(ArtifactLocator::new(config(".ll", ".opt")).is_err());
        assert!(ArtifactLocator::new(config(".ll", ".ll")).is_err());
        assert!(ArtifactLocator::new(LocatorConfig::default()).is_ok());
    }

    #[test]
    fn non_utf8_content_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Foo_bar_()V.ll"), [0xff, 0xfe]).unwrap();
        let err = ArtifactLocator::default()
            .resolve(dir.path(), &ArtifactQuery::with_descriptor("Foo", "bar", "()V"))
            .unwrap_err();
        match err {
            LocateError::Io { path, source } => {
                assert!(path.ends_with("Foo_bar_()V.ll"));
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = dump_dir(&[("Foo_bar_()V-b.ll", "valid")]);
        let odd = OsStr::from_bytes(b"Foo_bar_()V-a\xff.ll");
        fs::write(dir.path().join(odd), "odd").unwrap();

        let locator = ArtifactLocator::default();
        let query = ArtifactQuery::with_descriptor("Foo", "bar", "()V");
        let candidates = locator.candidates(dir.path(), &query).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].ends_with("Foo_bar_()V-b.ll"));
        assert_eq!(locator.resolve(dir.path(), &query).unwrap().lines.lines(), ["valid"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_artifacts_are_followed() {
        let target_dir = dump_dir(&[("elsewhere.txt", "entry:\nret void\n")]);
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(
            target_dir.path().join("elsewhere.txt"),
            dir.path().join("Foo_bar_()V.ll"),
        )
        .unwrap();

        let artifact = ArtifactLocator::default()
            .resolve(dir.path(), &ArtifactQuery::with_descriptor("Foo", "bar", "()V"))
            .unwrap();
        assert!(artifact.path.ends_with("Foo_bar_()V.ll"));
        assert_eq!(artifact.lines.lines(), ["entry:", "ret void"]);
    }

    #[test]
    fn pick_reuses_a_collected_listing() {
        let dir = dump_dir(&[("Foo_bar_()V-1.ll", "a"), ("Foo_bar_()V-2.ll", "b")]);
        let locator = ArtifactLocator::default();
        let query = ArtifactQuery::with_descriptor("Foo", "bar", "()V").index(1);
        let candidates = locator.candidates(dir.path(), &query).unwrap();
        let path = locator.pick(dir.path(), &query, candidates).unwrap();
        assert!(path.ends_with("Foo_bar_()V-2.ll"));
        assert_eq!(locator.load(&query, path).unwrap().lines.lines(), ["b"]);
        assert!(matches!(
            locator.pick(dir.path(), &query, Vec::new()),
            Err(LocateError::NoMatchingArtifact { .. })
        ));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let parsed: Result<LocatorConfig, _> = serde_yaml::from_str("primary_suffix: .txt\n");
        assert!(parsed.is_err());
        let parsed: LocatorConfig = serde_yaml::from_str("suffix: .txt\noptimized_suffix: .opt.txt\n").unwrap();
        assert_eq!(parsed.primary_suffix, ".txt");
    }

    #[test]
    fn locate_normalizes_loaded_lines() {
        let dir = dump_dir(&[(
            "Foo_bar_()V.ll",
            "define void @f() {\n\nentry:\n    ret   void\n}\n",
        )]);
        let mut matcher = ArtifactLocator::default()
            .locate(dir.path(), &ArtifactQuery::with_descriptor("Foo", "bar", "()V"))
            .unwrap();
        assert_eq!(matcher.buffer().len(), 4);
        matcher.check("entry:").unwrap();
        matcher.check_next("ret void").unwrap();
    }
}
