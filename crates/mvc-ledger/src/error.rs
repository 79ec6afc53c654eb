use mvc_types::RepoPath;

/// Errors produced by commit model operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("nothing to commit: staging area is empty")]
    EmptyCommit,

    #[error("no content captured for staged file {0}")]
    MissingContent(RepoPath),

    #[error("commit {prefix:?} not found")]
    CommitNotFound { prefix: String },

    #[error("commit prefix {prefix:?} is ambiguous: {matches} commits match")]
    AmbiguousPrefix { prefix: String, matches: usize },

    #[error("store error: {0}")]
    Store(#[from] mvc_store::StoreError),

    #[error("hashing error: {0}")]
    Hashing(#[from] mvc_crypto::HasherError),
}

/// Convenience alias for ledger results.
pub type LedgerResult<T> = Result<T, LedgerError>;
