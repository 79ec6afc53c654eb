//! Content hashing for mvc.
//!
//! Provides the domain-separated BLAKE3 [`ContentHasher`] used to fingerprint
//! staged file contents and serialized commit bodies. Pure functions, no
//! state, no custom cryptography.

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
