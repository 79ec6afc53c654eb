use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mvc_crypto::{ContentHasher, HasherError};
use mvc_types::{Fingerprint, RepoPath};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Staging index record
// ---------------------------------------------------------------------------

/// One staged path as persisted in `index.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEntry {
    pub fingerprint: Fingerprint,
}

/// Persisted form of the staging index.
///
/// Serialized as a JSON object keyed by path, e.g.
/// `{"a.txt": {"fingerprint": "..."}}`. An empty index is `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexRecord {
    pub entries: BTreeMap<RepoPath, StagedEntry>,
}

impl IndexRecord {
    /// An empty index record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// A file captured in a commit: its staged fingerprint plus its full content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub fingerprint: Fingerprint,
    pub content: String,
}

/// The hashed part of a commit. Field order is fixed so serialization is
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitBody {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub files: BTreeMap<RepoPath, SnapshotFile>,
}

impl CommitBody {
    /// Fingerprint of the serialized body: the commit id.
    pub fn compute_id(&self) -> Result<Fingerprint, HasherError> {
        ContentHasher::COMMIT.hash_json(self)
    }
}

/// Immutable, content-addressed snapshot record.
///
/// The id is always derived from the body; there is no way to construct a
/// `Commit` with a caller-supplied id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    id: Fingerprint,
    body: CommitBody,
}

impl Commit {
    /// Seal a body into a commit by computing its id.
    pub fn seal(body: CommitBody) -> Result<Self, HasherError> {
        let id = body.compute_id()?;
        Ok(Self { id, body })
    }

    pub fn id(&self) -> Fingerprint {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.body.timestamp
    }

    pub fn files(&self) -> &BTreeMap<RepoPath, SnapshotFile> {
        &self.body.files
    }

    pub fn body(&self) -> &CommitBody {
        &self.body
    }

    /// Path to full-content map, the shape the reconciliation engine consumes.
    pub fn contents(&self) -> BTreeMap<RepoPath, String> {
        self.body
            .files
            .iter()
            .map(|(path, file)| (path.clone(), file.content.clone()))
            .collect()
    }
}
