//! Corpus scanning.
//!
//! Walks the published-pages directory and collects every document source
//! path in a deterministic order: entries of each directory are visited
//! lexicographically by file name, depth-first, so two scans of an
//! unchanged tree always produce the same sequence.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while scanning the corpus.
///
/// Nothing is skipped: an unreadable root or a failed directory entry
/// aborts the whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root directory is not readable: `{0}`")]
    Root(PathBuf, #[source] walkdir::Error),

    #[error("failed to read entry under `{0}`")]
    Entry(PathBuf, #[source] walkdir::Error),
}

/// Collect all document paths under `root` whose file name ends with
/// `extension` (exact, case-sensitive suffix match).
///
/// The result is fully materialized before returning; corpus sizes are
/// small enough that streaming buys nothing.
pub fn scan(root: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let at = err.path().unwrap_or(root).to_path_buf();
            if err.depth() == 0 {
                ScanError::Root(at, err)
            } else {
                ScanError::Entry(at, err)
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(extension));
        if matches {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "content").unwrap();
        }
        dir
    }

    fn relative(paths: &[PathBuf], root: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = make_tree(&["a.mdx", "b.md", "c.txt", "d.mdx"]);
        let paths = scan(dir.path(), ".mdx").unwrap();
        assert_eq!(relative(&paths, dir.path()), vec!["a.mdx", "d.mdx"]);
    }

    #[test]
    fn test_scan_extension_match_is_case_sensitive() {
        let dir = make_tree(&["a.MDX", "b.mdx"]);
        let paths = scan(dir.path(), ".mdx").unwrap();
        assert_eq!(relative(&paths, dir.path()), vec!["b.mdx"]);
    }

    #[test]
    fn test_scan_orders_entries_lexicographically_per_directory() {
        let dir = make_tree(&[
            "zz.mdx",
            "aa.mdx",
            "nested/later.mdx",
            "nested/early.mdx",
        ]);
        let paths = scan(dir.path(), ".mdx").unwrap();
        assert_eq!(
            relative(&paths, dir.path()),
            vec!["aa.mdx", "nested/early.mdx", "nested/later.mdx", "zz.mdx"]
        );
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = make_tree(&["b/x.mdx", "a/y.mdx", "c.mdx", "a/z.mdx"]);
        let first = scan(dir.path(), ".mdx").unwrap();
        let second = scan(dir.path(), ".mdx").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no_such_dir");
        let err = scan(&missing, ".mdx").unwrap_err();
        assert!(matches!(err, ScanError::Root(..)));
        assert!(err.to_string().contains("no_such_dir"));
    }
}
