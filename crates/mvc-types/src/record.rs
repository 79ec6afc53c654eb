use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::path::RepoPath;

/// A tracked file's content at a point in time.
///
/// Immutable once created: restaging a path replaces the record rather than
/// mutating it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Repository-relative path.
    pub path: RepoPath,
    /// Fingerprint of the file's bytes when it was staged.
    pub fingerprint: Fingerprint,
}

impl FileRecord {
    /// Create a new file record.
    pub fn new(path: RepoPath, fingerprint: Fingerprint) -> Self {
        Self { path, fingerprint }
    }
}
