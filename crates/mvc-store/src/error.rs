use std::io;
use std::path::PathBuf;

use mvc_crypto::HasherError;
use mvc_types::Fingerprint;

/// Errors from repository store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The repository marker directory does not exist.
    #[error("not an mvc repository: {}", .root.display())]
    NotARepository { root: PathBuf },

    /// `initialize` was called on an existing repository.
    #[error("repository already initialized at {}", .root.display())]
    AlreadyInitialized { root: PathBuf },

    /// I/O error from the underlying storage, with the offending path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("malformed record at {}: {reason}", .path.display())]
    Serialization { path: PathBuf, reason: String },

    /// A commit record's body does not hash to the id it is stored under.
    #[error("commit {id} is corrupt: body hashes to {computed}")]
    HashMismatch { id: Fingerprint, computed: Fingerprint },

    /// HEAD or a listing refers to a commit with no stored record.
    #[error("commit record not found: {0}")]
    MissingCommit(Fingerprint),

    /// Commit body could not be hashed.
    #[error("hashing error: {0}")]
    Hashing(#[from] HasherError),
}

impl StoreError {
    /// Build an [`StoreError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`StoreError::Serialization`] for `path`.
    pub fn serialization(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Serialization {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
