//! High-level SDK for mvc.
//!
//! [`Repository`] is the handle every command goes through. It carries the
//! repository root explicitly, so nothing depends on the process working
//! directory once the handle exists.
//!
//! ```no_run
//! use mvc_sdk::Repository;
//!
//! let repo = Repository::init("/tmp/project")?;
//! std::fs::write("/tmp/project/a.txt", "hello")?;
//! repo.add("a.txt")?;
//! let committed = repo.commit("first")?;
//! println!("{}", repo.short_id(&committed.commit.id()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod worktree;

pub use config::MvcConfig;
pub use error::{SdkError, SdkResult};
pub use repository::{CommitSummary, FileChange, Repository, StatusReport};
pub use worktree::WorkTree;

// Re-export key types
pub use mvc_checkout::{CheckoutReport, ConfirmOverwrite, FileOutcome, PreviewStyle};
pub use mvc_diff::{DiffHunk, DiffOp, LineDiff};
pub use mvc_index::StageOutcome;
pub use mvc_ledger::Commit;
pub use mvc_types::{Fingerprint, RepoPath};
