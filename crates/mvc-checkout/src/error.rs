use std::path::PathBuf;

use mvc_ledger::LedgerError;
use mvc_store::StoreError;

/// Errors produced while restoring a commit.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("commit lookup failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("working tree I/O error at {}: {source}", .path.display())]
    WorkingTree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckoutError {
    /// Wrap an I/O failure on a working-tree file.
    pub fn working_tree(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WorkingTree {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for checkout results.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
