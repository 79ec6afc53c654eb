use std::path::{Path, PathBuf};

use mvc_checkout::CheckoutError;
use mvc_ledger::LedgerError;
use mvc_store::StoreError;
use thiserror::Error;

/// Errors reported by repository commands.
///
/// Lower-layer errors are folded into the user-facing categories here, so a
/// caller only ever matches on one enum.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not an mvc repository (no .mvc directory in {})", .root.display())]
    NotARepository { root: PathBuf },

    #[error("repository already initialized in {}", .root.display())]
    AlreadyInitialized { root: PathBuf },

    #[error("file {0} does not exist")]
    FileNotFound(String),

    #[error("nothing to commit: staging area is empty")]
    EmptyCommit,

    #[error("{}", describe_prefix(.prefix, .matches))]
    AmbiguousOrNotFound { prefix: String, matches: usize },

    #[error("invalid path: {0}")]
    InvalidPath(#[from] mvc_types::TypeError),

    #[error("invalid configuration in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("commit error: {0}")]
    Ledger(LedgerError),
}

impl SdkError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn describe_prefix(prefix: &str, matches: &usize) -> String {
    if *matches == 0 {
        format!("no commit matches {prefix:?}")
    } else {
        format!("commit prefix {prefix:?} is ambiguous: {matches} commits match")
    }
}

impl From<StoreError> for SdkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotARepository { root } => Self::NotARepository { root },
            StoreError::AlreadyInitialized { root } => Self::AlreadyInitialized { root },
            other => Self::Storage(other),
        }
    }
}

impl From<LedgerError> for SdkError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::EmptyCommit => Self::EmptyCommit,
            LedgerError::CommitNotFound { prefix } => Self::AmbiguousOrNotFound { prefix, matches: 0 },
            LedgerError::AmbiguousPrefix { prefix, matches } => {
                Self::AmbiguousOrNotFound { prefix, matches }
            }
            LedgerError::MissingContent(path) => Self::FileNotFound(path.to_string()),
            LedgerError::Store(e) => e.into(),
            other => Self::Ledger(other),
        }
    }
}

impl From<CheckoutError> for SdkError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Ledger(e) => e.into(),
            CheckoutError::Store(e) => e.into(),
            CheckoutError::WorkingTree { path, source } => Self::Io { path, source },
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
