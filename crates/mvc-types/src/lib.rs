//! Foundation types for mvc.
//!
//! This crate provides the identifiers and records shared by every other
//! mvc crate.
//!
//! # Key Types
//!
//! - [`Fingerprint`] — Content-derived identifier (BLAKE3 hash), hex on the wire
//! - [`FileRecord`] — A tracked file's path paired with its content fingerprint
//! - [`RepoPath`] — Repository-relative, slash-normalized path

pub mod error;
pub mod fingerprint;
pub mod path;
pub mod record;

pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use path::RepoPath;
pub use record::FileRecord;
