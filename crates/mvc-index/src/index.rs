//! The [`StagingIndex`] structure managing staged files in memory.
//!
//! All operations are in-memory and accept already-read bytes; reading files
//! from the working tree and persisting the index are the caller's job.

use std::collections::BTreeMap;

use mvc_crypto::ContentHasher;
use mvc_store::{IndexRecord, StagedEntry};
use mvc_types::{FileRecord, RepoPath};
use tracing::debug;

/// What staging a file did to the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// The path was not staged before.
    Added,
    /// The path was staged with different content; the fingerprint changed.
    Updated,
    /// The path was already staged with identical content.
    Unchanged,
}

/// The staging index: which files go into the next commit.
///
/// Keys are unique by path. Entries are not re-validated against the working
/// tree after staging; a file deleted after `add` is only noticed at commit
/// time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StagingIndex {
    entries: BTreeMap<RepoPath, FileRecord>,
}

impl StagingIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the record for a path.
    pub fn get(&self, path: &RepoPath) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    /// Iterate over staged records in path order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values()
    }

    /// Staged paths in order.
    pub fn paths(&self) -> Vec<RepoPath> {
        self.entries.keys().cloned().collect()
    }

    /// Stage `content` under `path`, inserting or overwriting its record.
    pub fn stage_file(&mut self, path: &RepoPath, content: &[u8]) -> StageOutcome {
        let fingerprint = ContentHasher::BLOB.hash(content);
        let outcome = match self.entries.get(path) {
            None => StageOutcome::Added,
            Some(existing) if existing.fingerprint == fingerprint => StageOutcome::Unchanged,
            Some(_) => StageOutcome::Updated,
        };
        if outcome != StageOutcome::Unchanged {
            self.entries
                .insert(path.clone(), FileRecord::new(path.clone(), fingerprint));
        }
        debug!(path = %path, fingerprint = %fingerprint.short_hex(7), ?outcome, "staged file");
        outcome
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rebuild from the persisted record.
    pub fn from_record(record: &IndexRecord) -> Self {
        let entries = record
            .entries
            .iter()
            .map(|(path, entry)| (path.clone(), FileRecord::new(path.clone(), entry.fingerprint)))
            .collect();
        Self { entries }
    }

    /// Convert into the persisted record form.
    pub fn to_record(&self) -> IndexRecord {
        IndexRecord {
            entries: self
                .entries
                .iter()
                .map(|(path, record)| {
                    (
                        path.clone(),
                        StagedEntry {
                            fingerprint: record.fingerprint,
                        },
                    )
                })
                .collect(),
        }
    }
}
