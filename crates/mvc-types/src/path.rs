//! Repository-relative path normalization.
//!
//! Valid repository paths:
//! - Are non-empty and relative to the repository root
//! - Use `/` as the only separator (`\` is rewritten to `/`)
//! - Contain no `.` or `..` components and no empty components
//! - Never point into the `.mvc` marker directory

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of the repository marker directory.
pub const MARKER_DIR: &str = ".mvc";

/// A repository-relative, slash-normalized path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Normalize and validate a user- or filesystem-supplied path.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_types::RepoPath;
    ///
    /// assert_eq!(RepoPath::new("./src\\main.rs").unwrap().as_str(), "src/main.rs");
    /// assert!(RepoPath::new("../escape.txt").is_err());
    /// assert!(RepoPath::new("/etc/passwd").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let unified = raw.replace('\\', "/");
        if unified.is_empty() {
            return Err(invalid("path must not be empty"));
        }
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(invalid("path must be relative to the repository root"));
        }

        let mut parts = Vec::new();
        for component in unified.split('/') {
            match component {
                "" | "." => continue,
                ".." => return Err(invalid("path must not contain '..'")),
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            return Err(invalid("path names no file"));
        }
        if parts[0] == MARKER_DIR {
            return Err(invalid("path points into the repository marker directory"));
        }

        Ok(Self(parts.join("/")))
    }

    /// The normalized path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Debug for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepoPath({})", self.0)
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}
