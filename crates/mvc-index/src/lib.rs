//! Staging index for mvc.
//!
//! Holds the set of files marked for the next commit, each keyed by its
//! repository-relative path and carrying the fingerprint of its content at
//! the time it was staged.
//!
//! # Key Types
//!
//! - [`StagingIndex`] -- The in-memory staging area (BTreeMap-backed)
//! - [`StageOutcome`] -- What a staging call changed

pub mod index;

pub use index::{StageOutcome, StagingIndex};
