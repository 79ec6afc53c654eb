//! Repository storage for mvc.
//!
//! This crate owns the durable representation of everything a repository
//! remembers: the staging index, the set of commit records, and the HEAD
//! pointer. Other crates receive copies and never touch storage directly.
//!
//! # Record Types
//!
//! - [`IndexRecord`] -- persisted staging index (path to fingerprint)
//! - [`Commit`] -- immutable snapshot, addressed by the fingerprint of its body
//!
//! # Storage Backends
//!
//! All backends implement the [`RepositoryStore`] trait:
//!
//! - [`FsRepositoryStore`] -- the on-disk `.mvc/` layout
//! - [`InMemoryRepositoryStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Commit records are immutable once written; rewriting an existing id is a no-op.
//! 2. Every record write is all-or-nothing (temp file + rename).
//! 3. An uninitialized repository rejects every operation except `initialize`.
//! 4. All I/O errors are propagated with the offending path, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{FsRepositoryStore, Layout};
pub use memory::InMemoryRepositoryStore;
pub use object::{Commit, CommitBody, IndexRecord, SnapshotFile, StagedEntry};
pub use traits::{CommitIter, RepositoryStore};
