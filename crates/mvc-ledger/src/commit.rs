use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use mvc_index::StagingIndex;
use mvc_store::{Commit, CommitBody, SnapshotFile};
use mvc_types::RepoPath;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Snapshot the staged files into a new commit stamped with the current time.
///
/// `contents` must hold the current full text of every staged path. Each
/// file's staged fingerprint is paired with that content: the commit is a
/// full copy, not a reference to the working tree.
pub fn create_commit(
    message: &str,
    staged: &StagingIndex,
    contents: &BTreeMap<RepoPath, String>,
) -> LedgerResult<Commit> {
    // Millisecond precision, as shown by `log`.
    create_commit_at(message, staged, contents, Utc::now().trunc_subsecs(3))
}

/// Like [`create_commit`], with an explicit timestamp.
pub fn create_commit_at(
    message: &str,
    staged: &StagingIndex,
    contents: &BTreeMap<RepoPath, String>,
    timestamp: DateTime<Utc>,
) -> LedgerResult<Commit> {
    if staged.is_empty() {
        return Err(LedgerError::EmptyCommit);
    }

    let mut files = BTreeMap::new();
    for record in staged.records() {
        let content = contents
            .get(&record.path)
            .ok_or_else(|| LedgerError::MissingContent(record.path.clone()))?;
        files.insert(
            record.path.clone(),
            SnapshotFile {
                fingerprint: record.fingerprint,
                content: content.clone(),
            },
        );
    }

    let commit = Commit::seal(CommitBody {
        message: message.to_string(),
        timestamp,
        files,
    })?;
    debug!(commit = %commit.id().short_hex(7), files = commit.files().len(), "created commit");
    Ok(commit)
}
