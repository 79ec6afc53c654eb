//! On-disk repository store.
//!
//! Layout under the repository root:
//!
//! ```text
//! .mvc/
//!   index.json           # staging index, {} when empty
//!   HEAD                 # full commit id, empty before the first commit
//!   config.toml          # repository settings (owned by the SDK)
//!   commits/
//!     <commit-id>.json   # one immutable record per commit
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mvc_types::path::MARKER_DIR;
use mvc_types::Fingerprint;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::object::{Commit, CommitBody, IndexRecord};
use crate::traits::RepositoryStore;

/// Paths that make up a repository on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub const INDEX_FILE: &'static str = "index.json";
    pub const HEAD_FILE: &'static str = "HEAD";
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const COMMITS_DIR: &'static str = "commits";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The working-tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The marker directory whose existence means "initialized".
    pub fn marker(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    pub fn index(&self) -> PathBuf {
        self.marker().join(Self::INDEX_FILE)
    }

    pub fn head(&self) -> PathBuf {
        self.marker().join(Self::HEAD_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.marker().join(Self::CONFIG_FILE)
    }

    pub fn commits(&self) -> PathBuf {
        self.marker().join(Self::COMMITS_DIR)
    }

    pub fn commit(&self, id: &Fingerprint) -> PathBuf {
        self.commits().join(format!("{}.json", id.to_hex()))
    }
}

/// Repository store backed by the `.mvc/` directory.
#[derive(Clone, Debug)]
pub struct FsRepositoryStore {
    layout: Layout,
}

impl FsRepositoryStore {
    /// Open the store for the repository rooted at `root`.
    ///
    /// Opening never touches the disk; initialization state is checked per
    /// operation.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::new(root),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Initialize the repository, seeding extra files into the marker
    /// directory (e.g. `config.toml`).
    ///
    /// The layout is assembled in a temporary sibling directory and renamed
    /// into place, so a failure at any step leaves no marker behind.
    pub fn initialize_with(&self, extra: &[(&str, &[u8])]) -> StoreResult<()> {
        let marker = self.layout.marker();
        if marker.exists() {
            return Err(StoreError::AlreadyInitialized {
                root: self.layout.root().to_path_buf(),
            });
        }

        let root = self.layout.root();
        let staging = tempfile::Builder::new()
            .prefix(".mvc-init-")
            .tempdir_in(root)
            .map_err(|e| StoreError::io(root, e))?;
        let dir = staging.path();

        let commits = dir.join(Layout::COMMITS_DIR);
        fs::create_dir(&commits).map_err(|e| StoreError::io(&commits, e))?;
        write_file(&dir.join(Layout::INDEX_FILE), b"{}")?;
        write_file(&dir.join(Layout::HEAD_FILE), b"")?;
        for (name, contents) in extra {
            write_file(&dir.join(name), contents)?;
        }

        fs::rename(dir, &marker).map_err(|e| StoreError::io(&marker, e))?;
        info!(root = %root.display(), "initialized repository");
        Ok(())
    }

    fn ensure_initialized(&self) -> StoreResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(StoreError::NotARepository {
                root: self.layout.root().to_path_buf(),
            })
        }
    }
}

impl RepositoryStore for FsRepositoryStore {
    fn is_initialized(&self) -> bool {
        self.layout.marker().is_dir()
    }

    fn initialize(&self) -> StoreResult<()> {
        self.initialize_with(&[])
    }

    fn load_index(&self) -> StoreResult<IndexRecord> {
        self.ensure_initialized()?;
        let path = self.layout.index();
        let bytes = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::serialization(&path, e))
    }

    fn save_index(&self, index: &IndexRecord) -> StoreResult<()> {
        self.ensure_initialized()?;
        let path = self.layout.index();
        let bytes =
            serde_json::to_vec_pretty(index).map_err(|e| StoreError::serialization(&path, e))?;
        write_atomic(&path, &bytes)?;
        debug!(entries = index.entries.len(), "saved index");
        Ok(())
    }

    fn load_commit(&self, id: &Fingerprint) -> StoreResult<Option<Commit>> {
        self.ensure_initialized()?;
        let path = self.layout.commit(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let body: CommitBody =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::serialization(&path, e))?;
        let commit = Commit::seal(body)?;
        if commit.id() != *id {
            return Err(StoreError::HashMismatch {
                id: *id,
                computed: commit.id(),
            });
        }
        Ok(Some(commit))
    }

    fn save_commit(&self, commit: &Commit) -> StoreResult<bool> {
        self.ensure_initialized()?;
        let path = self.layout.commit(&commit.id());
        if path.exists() {
            debug!(commit = %commit.id().short_hex(7), "commit already stored");
            return Ok(false);
        }
        let bytes = serde_json::to_vec_pretty(commit.body())
            .map_err(|e| StoreError::serialization(&path, e))?;
        write_atomic(&path, &bytes)?;
        debug!(commit = %commit.id().short_hex(7), files = commit.files().len(), "wrote commit");
        Ok(true)
    }

    fn commit_ids(&self) -> StoreResult<Vec<Fingerprint>> {
        self.ensure_initialized()?;
        let dir = self.layout.commits();
        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let parsed = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| Fingerprint::from_hex(stem).ok());
            match parsed {
                Some(id) => ids.push(id),
                None => warn!(path = %path.display(), "ignoring unrecognized file in commits"),
            }
        }
        Ok(ids)
    }

    fn read_head(&self) -> StoreResult<Option<Fingerprint>> {
        self.ensure_initialized()?;
        let path = self.layout.head();
        let raw = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Fingerprint::from_hex(raw)
            .map(Some)
            .map_err(|e| StoreError::serialization(&path, e))
    }

    fn write_head(&self, id: &Fingerprint) -> StoreResult<()> {
        self.ensure_initialized()?;
        write_atomic(&self.layout.head(), id.to_hex().as_bytes())?;
        info!(head = %id.short_hex(7), "moved HEAD");
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> StoreResult<()> {
    fs::write(path, contents).map_err(|e| StoreError::io(path, e))
}

/// Replace `path` with `contents` via a temp file in the same directory.
fn write_atomic(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(contents).map_err(|e| StoreError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}
