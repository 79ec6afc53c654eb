use mvc_diff::{aligned_diff, line_diff, LineDiff};
use mvc_ledger::{resolve_prefix, Commit};
use mvc_store::RepositoryStore;
use mvc_types::RepoPath;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CheckoutResult;
use crate::working::{ConfirmOverwrite, WorkingFiles};

// ---------------------------------------------------------------------------
// PreviewStyle
// ---------------------------------------------------------------------------

/// Which diff is shown before asking to overwrite a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStyle {
    /// Line `i` of the working file against line `i` of the commit.
    #[default]
    Aligned,
    /// Longest-common-subsequence diff, as `status` shows it.
    Lcs,
}

impl PreviewStyle {
    /// Diff from the working file's `current` text to the committed `target`.
    pub fn preview(self, current: &str, target: &str) -> LineDiff {
        match self {
            Self::Aligned => aligned_diff(current, target),
            Self::Lcs => line_diff(current, target),
        }
    }
}

// ---------------------------------------------------------------------------
// CheckoutReport
// ---------------------------------------------------------------------------

/// What happened to one file of the target commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was missing and has been written.
    Restored,
    /// The file already had the committed content; nothing was written.
    Unchanged,
    /// The file differed and the overwrite was confirmed.
    Overwritten,
    /// The file differed and the overwrite was declined.
    Declined,
}

impl FileOutcome {
    /// Returns `true` if the file was written.
    pub fn wrote(self) -> bool {
        matches!(self, Self::Restored | Self::Overwritten)
    }
}

/// The result of a completed checkout.
#[derive(Clone, Debug)]
pub struct CheckoutReport {
    /// The commit that HEAD now points to.
    pub commit: Commit,
    /// Per-file outcomes in path order.
    pub files: Vec<(RepoPath, FileOutcome)>,
}

impl CheckoutReport {
    /// Paths with the given outcome.
    pub fn with_outcome(&self, outcome: FileOutcome) -> Vec<&RepoPath> {
        self.files
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(p, _)| p)
            .collect()
    }

    /// Number of files written to the working tree.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|(_, o)| o.wrote()).count()
    }
}

// ---------------------------------------------------------------------------
// CheckoutCoordinator
// ---------------------------------------------------------------------------

/// Restores a commit's files into the working tree.
///
/// Checkout is additive: files absent from the target commit stay in the
/// working tree untouched. HEAD moves to the target once every file has been
/// processed, whether or not each overwrite was accepted.
pub struct CheckoutCoordinator<'a, S: ?Sized, W: ?Sized> {
    store: &'a S,
    files: &'a W,
    preview: PreviewStyle,
}

impl<'a, S, W> CheckoutCoordinator<'a, S, W>
where
    S: RepositoryStore + ?Sized,
    W: WorkingFiles + ?Sized,
{
    /// Create a coordinator with the default aligned preview.
    pub fn new(store: &'a S, files: &'a W) -> Self {
        Self {
            store,
            files,
            preview: PreviewStyle::default(),
        }
    }

    /// Use a different preview diff.
    pub fn with_preview(mut self, preview: PreviewStyle) -> Self {
        self.preview = preview;
        self
    }

    /// Check out the single commit whose id starts with `prefix`.
    ///
    /// Fails before touching the working tree if the prefix matches no
    /// commit or more than one.
    pub fn checkout(
        &self,
        prefix: &str,
        confirm: &mut dyn ConfirmOverwrite,
    ) -> CheckoutResult<CheckoutReport> {
        let commit = resolve_prefix(self.store, prefix)?;
        self.checkout_commit(commit, confirm)
    }

    /// Check out an already resolved commit.
    pub fn checkout_commit(
        &self,
        commit: Commit,
        confirm: &mut dyn ConfirmOverwrite,
    ) -> CheckoutResult<CheckoutReport> {
        let mut files = Vec::with_capacity(commit.files().len());

        for (path, snapshot) in commit.files() {
            let outcome = self.restore_file(path, &snapshot.content, confirm)?;
            debug!(path = %path, ?outcome, "checkout file");
            files.push((path.clone(), outcome));
        }

        self.store.write_head(&commit.id())?;
        let report = CheckoutReport { commit, files };
        info!(
            commit = %report.commit.id().short_hex(7),
            written = report.written(),
            "checked out commit"
        );
        Ok(report)
    }

    fn restore_file(
        &self,
        path: &RepoPath,
        target: &str,
        confirm: &mut dyn ConfirmOverwrite,
    ) -> CheckoutResult<FileOutcome> {
        let Some(current) = self.files.read_text(path)? else {
            self.files.write_text(path, target)?;
            return Ok(FileOutcome::Restored);
        };

        if current.as_bytes() == target.as_bytes() {
            return Ok(FileOutcome::Unchanged);
        }

        let preview = self.preview.preview(&current, target);
        if confirm.confirm(path, &preview) {
            self.files.write_text(path, target)?;
            Ok(FileOutcome::Overwritten)
        } else {
            Ok(FileOutcome::Declined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use mvc_diff::DiffOp;
    use mvc_index::StagingIndex;
    use mvc_ledger::{create_commit_at, LedgerError};
    use mvc_store::InMemoryRepositoryStore;

    use crate::error::CheckoutError;

    #[derive(Default)]
    struct FakeTree {
        files: RefCell<BTreeMap<RepoPath, String>>,
        writes: RefCell<Vec<RepoPath>>,
    }

    impl FakeTree {
        fn with(files: &[(&str, &str)]) -> Self {
            let tree = Self::default();
            for (p, c) in files {
                tree.files.borrow_mut().insert(path(p), c.to_string());
            }
            tree
        }

        fn get(&self, p: &str) -> Option<String> {
            self.files.borrow().get(&path(p)).cloned()
        }
    }

    impl WorkingFiles for FakeTree {
        fn read_text(&self, path: &RepoPath) -> CheckoutResult<Option<String>> {
            Ok(self.files.borrow().get(path).cloned())
        }

        fn write_text(&self, path: &RepoPath, content: &str) -> CheckoutResult<()> {
            self.files.borrow_mut().insert(path.clone(), content.to_string());
            self.writes.borrow_mut().push(path.clone());
            Ok(())
        }
    }

    /// Answers every prompt the same way and records what was asked.
    struct Scripted {
        answer: bool,
        asked: Vec<(RepoPath, LineDiff)>,
    }

    impl Scripted {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: Vec::new(),
            }
        }
    }

    impl ConfirmOverwrite for Scripted {
        fn confirm(&mut self, path: &RepoPath, preview: &LineDiff) -> bool {
            self.asked.push((path.clone(), preview.clone()));
            self.answer
        }
    }

    fn path(p: &str) -> RepoPath {
        RepoPath::new(p).unwrap()
    }

    fn stored_commit(store: &InMemoryRepositoryStore, files: &[(&str, &str)]) -> Commit {
        let mut index = StagingIndex::new();
        let mut contents = BTreeMap::new();
        for (p, c) in files {
            index.stage_file(&path(p), c.as_bytes());
            contents.insert(path(p), c.to_string());
        }
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let commit = create_commit_at("snapshot", &index, &contents, at).unwrap();
        store.save_commit(&commit).unwrap();
        commit
    }

    #[test]
    fn missing_file_is_restored_without_prompt() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("dir/a.txt", "hello")]);
        let tree = FakeTree::default();
        let mut confirm = Scripted::answering(false);

        let report = CheckoutCoordinator::new(&store, &tree)
            .checkout(&commit.id().short_hex(7), &mut confirm)
            .unwrap();

        assert!(confirm.asked.is_empty());
        assert_eq!(tree.get("dir/a.txt").as_deref(), Some("hello"));
        assert_eq!(report.files, vec![(path("dir/a.txt"), FileOutcome::Restored)]);
        assert_eq!(store.read_head().unwrap(), Some(commit.id()));
    }

    #[test]
    fn identical_file_gets_no_prompt_and_no_write() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("a.txt", "same")]);
        let tree = FakeTree::with(&[("a.txt", "same")]);
        let mut confirm = Scripted::answering(true);

        let report = CheckoutCoordinator::new(&store, &tree)
            .checkout(&commit.id().to_hex(), &mut confirm)
            .unwrap();

        assert!(confirm.asked.is_empty());
        assert!(tree.writes.borrow().is_empty());
        assert_eq!(report.with_outcome(FileOutcome::Unchanged), vec![&path("a.txt")]);
    }

    #[test]
    fn confirmed_overwrite_restores_content() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("a.txt", "hello")]);
        let tree = FakeTree::with(&[("a.txt", "world")]);
        let mut confirm = Scripted::answering(true);

        let report = CheckoutCoordinator::new(&store, &tree)
            .checkout(&commit.id().short_hex(7), &mut confirm)
            .unwrap();

        assert_eq!(tree.get("a.txt").as_deref(), Some("hello"));
        assert_eq!(report.written(), 1);
        let (asked, preview) = &confirm.asked[0];
        assert_eq!(asked, &path("a.txt"));
        assert_eq!(
            preview.ops,
            vec![DiffOp::Removed("world".into()), DiffOp::Added("hello".into())]
        );
    }

    #[test]
    fn declined_overwrite_keeps_file_but_moves_head() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("a.txt", "hello")]);
        let tree = FakeTree::with(&[("a.txt", "local edits")]);
        let mut confirm = Scripted::answering(false);

        let report = CheckoutCoordinator::new(&store, &tree)
            .checkout(&commit.id().short_hex(7), &mut confirm)
            .unwrap();

        assert_eq!(tree.get("a.txt").as_deref(), Some("local edits"));
        assert_eq!(report.with_outcome(FileOutcome::Declined), vec![&path("a.txt")]);
        assert_eq!(report.written(), 0);
        assert_eq!(store.read_head().unwrap(), Some(commit.id()));
    }

    #[test]
    fn files_outside_the_commit_are_left_alone() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("a.txt", "a")]);
        let tree = FakeTree::with(&[("extra.txt", "keep me")]);

        CheckoutCoordinator::new(&store, &tree)
            .checkout(&commit.id().to_hex(), &mut Scripted::answering(true))
            .unwrap();

        assert_eq!(tree.get("extra.txt").as_deref(), Some("keep me"));
        assert_eq!(tree.get("a.txt").as_deref(), Some("a"));
    }

    #[test]
    fn unknown_prefix_fails_without_side_effects() {
        let store = InMemoryRepositoryStore::initialized();
        stored_commit(&store, &[("a.txt", "a")]);
        let tree = FakeTree::default();

        let err = CheckoutCoordinator::new(&store, &tree)
            .checkout("not-hex", &mut Scripted::answering(true))
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Ledger(LedgerError::CommitNotFound { .. })
        ));
        assert!(tree.writes.borrow().is_empty());
        assert_eq!(store.read_head().unwrap(), None);
    }

    #[test]
    fn lcs_preview_is_used_when_configured() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("a.txt", "a\nb\nc")]);
        let tree = FakeTree::with(&[("a.txt", "a\nc")]);
        let mut confirm = Scripted::answering(false);

        CheckoutCoordinator::new(&store, &tree)
            .with_preview(PreviewStyle::Lcs)
            .checkout(&commit.id().to_hex(), &mut confirm)
            .unwrap();

        let changes: Vec<_> = confirm.asked[0]
            .1
            .ops
            .iter()
            .filter(|op| op.is_change())
            .cloned()
            .collect();
        assert_eq!(changes, vec![DiffOp::Added("b".into())]);
    }

    #[test]
    fn closures_can_confirm() {
        let store = InMemoryRepositoryStore::initialized();
        let commit = stored_commit(&store, &[("a.txt", "new")]);
        let tree = FakeTree::with(&[("a.txt", "old")]);
        let mut prompts = 0;
        let mut confirm = |_: &RepoPath, _: &LineDiff| {
            prompts += 1;
            true
        };

        CheckoutCoordinator::new(&store, &tree)
            .checkout(&commit.id().to_hex(), &mut confirm)
            .unwrap();

        assert_eq!(prompts, 1);
        assert_eq!(tree.get("a.txt").as_deref(), Some("new"));
    }

    #[test]
    fn preview_style_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            style: PreviewStyle,
        }
        let parsed: Wrapper = toml::from_str("style = \"lcs\"").unwrap();
        assert_eq!(parsed.style, PreviewStyle::Lcs);
        assert_eq!(PreviewStyle::default(), PreviewStyle::Aligned);
    }
}
