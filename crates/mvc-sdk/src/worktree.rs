//! Filesystem access to the working tree.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use mvc_checkout::{CheckoutError, CheckoutResult, WorkingFiles};
use mvc_types::path::MARKER_DIR;
use mvc_types::RepoPath;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{SdkError, SdkResult};

/// The files under a repository root, minus the marker directory and
/// ignored paths.
///
/// Content is read as UTF-8 text; invalid sequences are replaced rather
/// than rejected.
#[derive(Debug)]
pub struct WorkTree {
    root: PathBuf,
    ignore: Gitignore,
}

impl WorkTree {
    /// Open the working tree at `root` with gitignore-style `patterns`.
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> SdkResult<Self> {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);
        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| SdkError::Config {
                    path: root.join(MARKER_DIR),
                    reason: format!("bad ignore pattern {pattern:?}: {e}"),
                })?;
        }
        let ignore = builder.build().map_err(|e| SdkError::Config {
            path: root.join(MARKER_DIR),
            reason: e.to_string(),
        })?;
        Ok(Self { root, ignore })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Turn a user-supplied file name into a repository path.
    ///
    /// Relative names are taken relative to the root. Absolute names must
    /// lie under it.
    pub fn resolve(&self, raw: &str) -> SdkResult<RepoPath> {
        let given = Path::new(raw);
        let relative = if given.is_absolute() {
            given.strip_prefix(&self.root).map_err(|_| {
                SdkError::InvalidPath(mvc_types::TypeError::InvalidPath {
                    path: raw.to_string(),
                    reason: format!("outside the repository at {}", self.root.display()),
                })
            })?
        } else {
            given
        };
        Ok(RepoPath::new(&relative.to_string_lossy())?)
    }

    /// Absolute filesystem location of `path`.
    pub fn locate(&self, path: &RepoPath) -> PathBuf {
        self.root.join(path.as_str())
    }

    /// Raw bytes of `path`. A missing file, or a directory, is `FileNotFound`.
    pub fn read_bytes(&self, path: &RepoPath) -> SdkResult<Vec<u8>> {
        let location = self.locate(path);
        if location.is_dir() {
            return Err(SdkError::FileNotFound(path.to_string()));
        }
        match fs::read(&location) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SdkError::FileNotFound(path.to_string()))
            }
            Err(e) => Err(SdkError::io(&location, e)),
        }
    }

    /// Text of `path`, or `None` if it does not exist.
    pub fn read_string(&self, path: &RepoPath) -> SdkResult<Option<String>> {
        match self.read_bytes(path) {
            Ok(bytes) => Ok(Some(decode(bytes))),
            Err(SdkError::FileNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Path to content map of every tracked-candidate file.
    ///
    /// Walks the whole tree, skipping `.mvc/` and ignored paths. Entries that
    /// cannot be visited are logged and left out.
    pub fn scan(&self) -> SdkResult<BTreeMap<RepoPath, String>> {
        let mut files = BTreeMap::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = self.repo_path(entry.path()) else {
                continue;
            };
            let bytes = fs::read(entry.path()).map_err(|e| SdkError::io(entry.path(), e))?;
            files.insert(path, decode(bytes));
        }

        debug!(files = files.len(), "scanned working tree");
        Ok(files)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let Ok(relative) = entry.path().strip_prefix(&self.root) else {
            return true;
        };
        if relative.starts_with(MARKER_DIR) {
            return true;
        }
        let is_dir = entry.file_type().is_dir();
        let ignored = self.ignore.matched(relative, is_dir).is_ignore();
        if ignored {
            debug!(path = %relative.display(), "ignored");
        }
        ignored
    }

    fn repo_path(&self, absolute: &Path) -> Option<RepoPath> {
        let relative = absolute.strip_prefix(&self.root).ok()?;
        match RepoPath::new(&relative.to_string_lossy()) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %relative.display(), error = %e, "skipping unrepresentable path");
                None
            }
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

impl WorkingFiles for WorkTree {
    fn read_text(&self, path: &RepoPath) -> CheckoutResult<Option<String>> {
        let location = self.locate(path);
        match fs::read(&location) {
            Ok(bytes) => Ok(Some(decode(bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CheckoutError::working_tree(location, e)),
        }
    }

    fn write_text(&self, path: &RepoPath, content: &str) -> CheckoutResult<()> {
        let location = self.locate(path);
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent).map_err(|e| CheckoutError::working_tree(parent, e))?;
        }
        fs::write(&location, content).map_err(|e| CheckoutError::working_tree(&location, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(files: &[(&str, &str)], ignore: &[&str]) -> (tempfile::TempDir, WorkTree) {
        let dir = tempfile::tempdir().unwrap();
        for (p, c) in files {
            let full = dir.path().join(p);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, c).unwrap();
        }
        let patterns: Vec<String> = ignore.iter().map(|s| s.to_string()).collect();
        let tree = WorkTree::new(dir.path(), &patterns).unwrap();
        (dir, tree)
    }

    fn path(p: &str) -> RepoPath {
        RepoPath::new(p).unwrap()
    }

    #[test]
    fn scan_is_recursive_and_skips_marker() {
        let (_dir, tree) = tree_with(
            &[("a.txt", "a"), ("src/lib.rs", "lib"), (".mvc/HEAD", "")],
            &[],
        );
        let files = tree.scan().unwrap();
        let paths: Vec<_> = files.keys().cloned().collect();
        assert_eq!(paths, vec![path("a.txt"), path("src/lib.rs")]);
        assert_eq!(files[&path("src/lib.rs")], "lib");
    }

    #[test]
    fn scan_honours_ignore_patterns() {
        let (_dir, tree) = tree_with(
            &[
                ("keep.txt", "k"),
                ("node_modules/pkg/index.js", "x"),
                ("build.log", "l"),
            ],
            &["node_modules/", "*.log"],
        );
        let files = tree.scan().unwrap();
        assert_eq!(files.keys().cloned().collect::<Vec<_>>(), vec![path("keep.txt")]);
    }

    #[test]
    fn resolve_relative_and_absolute_names() {
        let (dir, tree) = tree_with(&[], &[]);
        assert_eq!(tree.resolve("./dir/a.txt").unwrap(), path("dir/a.txt"));

        let absolute = dir.path().join("b.txt");
        assert_eq!(tree.resolve(absolute.to_str().unwrap()).unwrap(), path("b.txt"));
    }

    #[test]
    fn resolve_rejects_paths_outside_root() {
        let (_dir, tree) = tree_with(&[], &[]);
        assert!(matches!(tree.resolve("../x"), Err(SdkError::InvalidPath(_))));
    }

    #[test]
    fn missing_files_and_directories_are_not_found() {
        let (_dir, tree) = tree_with(&[("dir/a.txt", "a")], &[]);
        assert!(matches!(tree.read_bytes(&path("nope.txt")), Err(SdkError::FileNotFound(_))));
        assert!(matches!(tree.read_bytes(&path("dir")), Err(SdkError::FileNotFound(_))));
        assert_eq!(tree.read_string(&path("nope.txt")).unwrap(), None);
    }

    #[test]
    fn write_text_creates_parent_directories() {
        let (dir, tree) = tree_with(&[], &[]);
        tree.write_text(&path("deep/nested/file.txt"), "content").unwrap();
        let written = fs::read_to_string(dir.path().join("deep/nested/file.txt")).unwrap();
        assert_eq!(written, "content");
        assert_eq!(
            tree.read_text(&path("deep/nested/file.txt")).unwrap().as_deref(),
            Some("content")
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let (dir, tree) = tree_with(&[], &[]);
        fs::write(dir.path().join("bin.dat"), [0x66, 0xff, 0x6f]).unwrap();
        let text = tree.read_string(&path("bin.dat")).unwrap().unwrap();
        assert_eq!(text, "f\u{fffd}o");
    }
}
