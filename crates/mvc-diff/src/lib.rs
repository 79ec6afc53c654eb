//! Reconciliation engine for mvc.
//!
//! Compares a committed snapshot against the working tree and explains the
//! differences.
//!
//! # Key Types
//!
//! - [`Reconciliation`] -- Per-path classification (modified/added/deleted/unchanged)
//! - [`LineDiff`] / [`DiffOp`] -- Line-level diff of one file
//! - [`DiffHunk`] -- A run of changes with surrounding context, for display
//!
//! Two line diffs are provided. [`line_diff`] groups insertions and deletions
//! by longest common subsequence and is what users read. [`aligned_diff`]
//! compares line `i` with line `i` and is the cheap preview shown before an
//! overwrite.

pub mod line_diff;
pub mod reconcile;

pub use line_diff::{aligned_diff, diff_hunks, line_diff, DiffHunk, DiffOp, LineDiff};
pub use reconcile::{reconcile, Reconciliation};
