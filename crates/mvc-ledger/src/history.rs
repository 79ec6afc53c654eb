use mvc_store::{Commit, RepositoryStore};

use crate::error::{LedgerError, LedgerResult};

/// All stored commits, newest first.
///
/// Ordered by timestamp, descending; commits with equal timestamps are
/// ordered by id, descending.
pub fn history<S: RepositoryStore + ?Sized>(store: &S) -> LedgerResult<Vec<Commit>> {
    let mut commits = store.list_commits()?.collect::<Result<Vec<_>, _>>()?;
    commits.sort_by(|a, b| {
        b.timestamp()
            .cmp(&a.timestamp())
            .then_with(|| b.id().cmp(&a.id()))
    });
    Ok(commits)
}

/// Find the single stored commit whose id starts with `prefix`.
///
/// Fails with [`LedgerError::CommitNotFound`] when nothing matches (an empty
/// prefix never matches) and with [`LedgerError::AmbiguousPrefix`] when more
/// than one commit does.
pub fn resolve_prefix<S: RepositoryStore + ?Sized>(store: &S, prefix: &str) -> LedgerResult<Commit> {
    let prefix = prefix.trim();
    let mut found: Option<Commit> = None;
    let mut matches = 0usize;

    for id in store.commit_ids()? {
        if !id.matches_prefix(prefix) {
            continue;
        }
        matches += 1;
        if found.is_none() {
            found = store.load_commit(&id)?;
        }
    }

    match (matches, found) {
        (1, Some(commit)) => Ok(commit),
        (0, _) | (1, None) => Err(LedgerError::CommitNotFound {
            prefix: prefix.to_string(),
        }),
        (n, _) => Err(LedgerError::AmbiguousPrefix {
            prefix: prefix.to_string(),
            matches: n,
        }),
    }
}
