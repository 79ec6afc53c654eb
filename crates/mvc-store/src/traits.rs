use mvc_types::Fingerprint;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::object::{Commit, IndexRecord};

/// Lazy, finite sequence of stored commits.
pub type CommitIter<'a> = Box<dyn Iterator<Item = StoreResult<Commit>> + 'a>;

/// Durable home of the staging index, the commit set, and HEAD.
///
/// All implementations must satisfy these invariants:
/// - Every operation other than `initialize` fails with
///   [`StoreError::NotARepository`] when the repository is not initialized.
/// - Commit records are immutable. Saving an id that already exists is a
///   no-op.
/// - A failed write leaves the previously stored record intact.
pub trait RepositoryStore: Send + Sync {
    /// Returns `true` if the repository marker exists.
    fn is_initialized(&self) -> bool;

    /// Create an empty repository: empty commit set, empty index, empty HEAD.
    ///
    /// Fails with [`StoreError::AlreadyInitialized`] if the marker exists.
    /// Never leaves a half-initialized repository behind.
    fn initialize(&self) -> StoreResult<()>;

    /// Load the persisted staging index.
    fn load_index(&self) -> StoreResult<IndexRecord>;

    /// Replace the persisted staging index.
    fn save_index(&self, index: &IndexRecord) -> StoreResult<()>;

    /// Load a commit by full id.
    ///
    /// Returns `Ok(None)` if no record exists under that id.
    fn load_commit(&self, id: &Fingerprint) -> StoreResult<Option<Commit>>;

    /// Write a commit record.
    ///
    /// Returns `true` if a new record was written, `false` if the id already
    /// existed (content-addressing makes the existing record identical).
    fn save_commit(&self, commit: &Commit) -> StoreResult<bool>;

    /// Ids of every stored commit, in no particular order.
    fn commit_ids(&self) -> StoreResult<Vec<Fingerprint>>;

    /// Read the HEAD pointer. `None` until the first commit or checkout.
    fn read_head(&self) -> StoreResult<Option<Fingerprint>>;

    /// Point HEAD at a commit id.
    fn write_head(&self, id: &Fingerprint) -> StoreResult<()>;

    /// All stored commits as a lazy sequence.
    ///
    /// Each call re-reads storage, so the sequence is restartable. Records
    /// that disappear between listing and loading are skipped.
    fn list_commits(&self) -> StoreResult<CommitIter<'_>> {
        let ids = self.commit_ids()?;
        Ok(Box::new(ids.into_iter().filter_map(move |id| {
            match self.load_commit(&id) {
                Ok(Some(commit)) => Some(Ok(commit)),
                Ok(None) => {
                    warn!(commit = %id.short_hex(7), "commit vanished during listing");
                    None
                }
                Err(e) => Some(Err(e)),
            }
        })))
    }

    /// Load the commit HEAD points to, if any.
    ///
    /// A HEAD naming a missing record is [`StoreError::MissingCommit`].
    fn head_commit(&self) -> StoreResult<Option<Commit>> {
        match self.read_head()? {
            None => Ok(None),
            Some(id) => match self.load_commit(&id)? {
                Some(commit) => Ok(Some(commit)),
                None => {
                    warn!(head = %id, "HEAD points to a missing commit");
                    Err(StoreError::MissingCommit(id))
                }
            },
        }
    }
}
