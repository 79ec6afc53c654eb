//! Commit model for mvc.
//!
//! This crate turns a staging index plus captured file contents into an
//! immutable, content-addressed [`Commit`], and answers history questions
//! over the stored commit set:
//! - [`create_commit`] snapshots staged files with their full content
//! - [`history`] lists commits newest first
//! - [`resolve_prefix`] finds the single commit whose id starts with a prefix
//!
//! Commits carry no parent links; the history is a flat set keyed by id.

pub mod commit;
pub mod error;
pub mod history;

pub use commit::{create_commit, create_commit_at};
pub use error::{LedgerError, LedgerResult};
pub use history::{history, resolve_prefix};

pub use mvc_store::Commit;
