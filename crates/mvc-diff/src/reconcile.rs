//! Classification of working-tree files against a committed snapshot.

use std::collections::{BTreeMap, BTreeSet};

use mvc_types::RepoPath;

/// How the current working tree relates to a committed snapshot.
///
/// Every path in either input lands in exactly one of the four sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// In both, with different content.
    pub modified: BTreeSet<RepoPath>,
    /// Only in the working tree (untracked).
    pub added: BTreeSet<RepoPath>,
    /// Only in the snapshot.
    pub deleted: BTreeSet<RepoPath>,
    /// In both, with identical content.
    pub unchanged: BTreeSet<RepoPath>,
}

impl Reconciliation {
    /// Returns `true` if nothing was modified, added, or deleted.
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Classify every path of `committed` and `current`.
///
/// Content is compared exactly, byte for byte.
pub fn reconcile(
    committed: &BTreeMap<RepoPath, String>,
    current: &BTreeMap<RepoPath, String>,
) -> Reconciliation {
    let mut result = Reconciliation::default();

    for (path, old) in committed {
        match current.get(path) {
            None => {
                result.deleted.insert(path.clone());
            }
            Some(new) if new == old => {
                result.unchanged.insert(path.clone());
            }
            Some(_) => {
                result.modified.insert(path.clone());
            }
        }
    }
    for path in current.keys() {
        if !committed.contains_key(path) {
            result.added.insert(path.clone());
        }
    }

    result
}
