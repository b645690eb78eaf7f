//! Discovery of check scripts on disk.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::DumpcheckError;

/// Returns true if the given path has a .yaml or .yml extension.
fn is_script_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Recursively scans `root` for check scripts.
///
/// The returned list is sorted so runs are reproducible.
pub fn discover_scripts<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, DumpcheckError> {
    let root = root.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| DumpcheckError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_script_file(entry.path()) {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    debug!(root = %root.display(), count = files.len(), "discovered check scripts");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_nested_yaml_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/z.yml"), "").unwrap();
        fs::write(dir.path().join("a.yaml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = discover_scripts(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("a.yaml"), dir.path().join("b/nested/z.yml")]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_scripts(dir.path().join("missing")).is_err());
    }
}
