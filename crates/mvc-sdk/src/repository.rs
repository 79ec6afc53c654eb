use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mvc_checkout::{CheckoutCoordinator, CheckoutReport, ConfirmOverwrite};
use mvc_diff::{diff_hunks, line_diff, reconcile, DiffHunk, LineDiff, Reconciliation};
use mvc_index::{StageOutcome, StagingIndex};
use mvc_ledger::{create_commit, history, Commit};
use mvc_store::{FsRepositoryStore, IndexRecord, Layout, RepositoryStore};
use mvc_types::{Fingerprint, RepoPath};
use tracing::{debug, info};

use crate::config::MvcConfig;
use crate::error::{SdkError, SdkResult};
use crate::worktree::WorkTree;

/// Result of a successful `commit`.
#[derive(Clone, Debug)]
pub struct CommitSummary {
    pub commit: Commit,
    /// `false` when an identical commit was already stored.
    pub newly_written: bool,
}

/// A modified file and its diff from the committed to the current content.
#[derive(Clone, Debug)]
pub struct FileChange {
    pub path: RepoPath,
    pub diff: LineDiff,
    /// The same diff grouped with `diff_context` lines of context.
    pub hunks: Vec<DiffHunk>,
}

/// Working tree state relative to HEAD and the staging index.
#[derive(Clone, Debug)]
pub struct StatusReport {
    /// Commit the working tree was compared against; `None` before the first
    /// commit.
    pub head: Option<Fingerprint>,
    /// Paths currently in the staging index.
    pub staged: Vec<RepoPath>,
    pub reconciliation: Reconciliation,
    /// Line diffs for every modified file, in path order.
    pub changes: Vec<FileChange>,
}

impl StatusReport {
    /// Files present in the working tree but neither committed at HEAD nor
    /// staged.
    pub fn untracked(&self) -> Vec<&RepoPath> {
        self.reconciliation
            .added
            .iter()
            .filter(|p| self.staged.binary_search(p).is_err())
            .collect()
    }

    /// Returns `true` if the working tree matches HEAD exactly.
    pub fn is_clean(&self) -> bool {
        self.reconciliation.is_clean()
    }
}

/// Handle to a repository rooted at an explicit directory.
#[derive(Debug)]
pub struct Repository {
    store: FsRepositoryStore,
    config: MvcConfig,
    tree: WorkTree,
}

impl Repository {
    /// Create a new repository at `root` and open it.
    ///
    /// Writes the default configuration alongside the empty index and HEAD.
    pub fn init(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let root = root.into();
        let store = FsRepositoryStore::open(&root);
        let config = MvcConfig::default();
        let rendered = config.to_toml().map_err(|reason| SdkError::Config {
            path: store.layout().config(),
            reason,
        })?;
        store.initialize_with(&[(Layout::CONFIG_FILE, rendered.as_bytes())])?;
        Self::assemble(store, config)
    }

    /// Open an existing repository at `root`.
    pub fn open(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let store = FsRepositoryStore::open(root);
        if !store.is_initialized() {
            return Err(SdkError::NotARepository {
                root: store.layout().root().to_path_buf(),
            });
        }
        let config = MvcConfig::load(&store.layout().config())?;
        Self::assemble(store, config)
    }

    fn assemble(store: FsRepositoryStore, config: MvcConfig) -> SdkResult<Self> {
        let tree = WorkTree::new(store.layout().root(), &config.ignore)?;
        Ok(Self {
            store,
            config,
            tree,
        })
    }

    // ---- Accessors ----

    pub fn root(&self) -> &Path {
        self.store.layout().root()
    }

    pub fn config(&self) -> &MvcConfig {
        &self.config
    }

    /// Commit id shortened to the configured length.
    pub fn short_id(&self, id: &Fingerprint) -> String {
        id.short_hex(self.config.short_id_len)
    }

    /// The commit HEAD points to, if any.
    pub fn head(&self) -> SdkResult<Option<Fingerprint>> {
        Ok(self.store.read_head()?)
    }

    /// The staging index as currently persisted.
    pub fn staged(&self) -> SdkResult<StagingIndex> {
        Ok(StagingIndex::from_record(&self.store.load_index()?))
    }

    // ---- Commands ----

    /// Stage the current content of `file`.
    pub fn add(&self, file: &str) -> SdkResult<(RepoPath, StageOutcome)> {
        let path = self.tree.resolve(file)?;
        let content = self.tree.read_bytes(&path)?;

        let mut index = self.staged()?;
        let outcome = index.stage_file(&path, &content);
        if outcome != StageOutcome::Unchanged {
            self.store.save_index(&index.to_record())?;
        }
        Ok((path, outcome))
    }

    /// Snapshot every staged file, advance HEAD and clear the index.
    ///
    /// All staged files are read before anything is written; a file deleted
    /// since `add` aborts the commit with [`SdkError::FileNotFound`].
    pub fn commit(&self, message: &str) -> SdkResult<CommitSummary> {
        let index = self.staged()?;

        let mut contents = BTreeMap::new();
        for path in index.paths() {
            let text = self
                .tree
                .read_string(&path)?
                .ok_or_else(|| SdkError::FileNotFound(path.to_string()))?;
            contents.insert(path, text);
        }

        let commit = create_commit(message, &index, &contents)?;
        let newly_written = self.store.save_commit(&commit)?;
        self.store.write_head(&commit.id())?;
        self.store.save_index(&IndexRecord::new())?;

        info!(
            commit = %self.short_id(&commit.id()),
            files = commit.files().len(),
            newly_written,
            "committed"
        );
        Ok(CommitSummary {
            commit,
            newly_written,
        })
    }

    /// Every commit, newest first.
    pub fn log(&self) -> SdkResult<Vec<Commit>> {
        Ok(history(&self.store)?)
    }

    /// Compare the working tree against the HEAD commit.
    ///
    /// Before the first commit the comparison is against an empty snapshot.
    pub fn status(&self) -> SdkResult<StatusReport> {
        let staged = self.staged()?.paths();
        let head = self.store.head_commit()?;
        let committed = head.as_ref().map(Commit::contents).unwrap_or_default();
        let current = self.tree.scan()?;

        let reconciliation = reconcile(&committed, &current);
        let changes = reconciliation
            .modified
            .iter()
            .map(|path| {
                let (old, new) = (&committed[path], &current[path]);
                FileChange {
                    path: path.clone(),
                    diff: line_diff(old, new),
                    hunks: diff_hunks(old, new, self.config.diff_context),
                }
            })
            .collect();

        debug!(
            modified = reconciliation.modified.len(),
            added = reconciliation.added.len(),
            deleted = reconciliation.deleted.len(),
            "status"
        );
        Ok(StatusReport {
            head: head.map(|c| c.id()),
            staged,
            reconciliation,
            changes,
        })
    }

    /// Restore the commit identified by `prefix` into the working tree.
    pub fn checkout(
        &self,
        prefix: &str,
        confirm: &mut dyn ConfirmOverwrite,
    ) -> SdkResult<CheckoutReport> {
        let report = CheckoutCoordinator::new(&self.store, &self.tree)
            .with_preview(self.config.checkout_preview)
            .checkout(prefix, confirm)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use mvc_checkout::{FileOutcome, PreviewStyle};
    use mvc_diff::DiffOp;

    /// Answers prompts from a fixed script; an exhausted script reads as EOF.
    struct Answers {
        script: Vec<bool>,
        asked: Vec<RepoPath>,
    }

    impl Answers {
        fn new(script: &[bool]) -> Self {
            Self {
                script: script.iter().rev().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl ConfirmOverwrite for Answers {
        fn confirm(&mut self, path: &RepoPath, _preview: &LineDiff) -> bool {
            self.asked.push(path.clone());
            self.script.pop().unwrap_or(false)
        }
    }

    fn setup() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn write(repo: &Repository, file: &str, content: &str) {
        let full = repo.root().join(file);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn read(repo: &Repository, file: &str) -> String {
        fs::read_to_string(repo.root().join(file)).unwrap()
    }

    fn path(p: &str) -> RepoPath {
        RepoPath::new(p).unwrap()
    }

    #[test]
    fn init_creates_layout_and_config() {
        let (dir, repo) = setup();
        let marker = dir.path().join(".mvc");
        assert!(marker.join("commits").is_dir());
        assert_eq!(fs::read_to_string(marker.join("index.json")).unwrap(), "{}");
        assert_eq!(fs::read_to_string(marker.join("HEAD")).unwrap(), "");
        assert_eq!(repo.config(), &MvcConfig::default());

        let reopened = Repository::open(dir.path()).unwrap();
        assert_eq!(reopened.config(), &MvcConfig::default());
    }

    #[test]
    fn init_twice_is_already_initialized() {
        let (dir, _repo) = setup();
        assert!(matches!(
            Repository::init(dir.path()),
            Err(SdkError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn open_requires_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Repository::open(dir.path()),
            Err(SdkError::NotARepository { .. })
        ));
    }

    #[test]
    fn open_reads_custom_config() {
        let (dir, _repo) = setup();
        fs::write(
            dir.path().join(".mvc/config.toml"),
            "short_id_len = 12\ncheckout_preview = \"lcs\"\n",
        )
        .unwrap();
        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(repo.config().short_id_len, 12);
        assert_eq!(repo.config().checkout_preview, PreviewStyle::Lcs);
    }

    #[test]
    fn add_missing_file_fails() {
        let (_dir, repo) = setup();
        assert!(matches!(repo.add("ghost.txt"), Err(SdkError::FileNotFound(_))));
        assert!(repo.staged().unwrap().is_empty());
    }

    #[test]
    fn add_reports_outcome() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "one");
        assert_eq!(repo.add("a.txt").unwrap().1, StageOutcome::Added);
        assert_eq!(repo.add("a.txt").unwrap().1, StageOutcome::Unchanged);
        write(&repo, "a.txt", "two");
        assert_eq!(repo.add("a.txt").unwrap().1, StageOutcome::Updated);
        assert_eq!(repo.staged().unwrap().len(), 1);
    }

    #[test]
    fn commit_clears_index_and_moves_head() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "hello");
        repo.add("a.txt").unwrap();

        let summary = repo.commit("first").unwrap();
        assert!(summary.newly_written);
        assert!(repo.staged().unwrap().is_empty());
        assert_eq!(repo.store.read_head().unwrap(), Some(summary.commit.id()));
        assert!(repo.store.layout().commit(&summary.commit.id()).is_file());
        assert_eq!(summary.commit.files()[&path("a.txt")].content, "hello");
    }

    #[test]
    fn empty_commit_writes_nothing() {
        let (dir, repo) = setup();
        assert!(matches!(repo.commit("nothing"), Err(SdkError::EmptyCommit)));
        assert_eq!(fs::read_dir(dir.path().join(".mvc/commits")).unwrap().count(), 0);
        assert_eq!(repo.store.read_head().unwrap(), None);
    }

    #[test]
    fn commit_of_vanished_file_fails_before_writing() {
        let (dir, repo) = setup();
        write(&repo, "a.txt", "x");
        repo.add("a.txt").unwrap();
        fs::remove_file(dir.path().join("a.txt")).unwrap();

        assert!(matches!(repo.commit("m"), Err(SdkError::FileNotFound(_))));
        assert_eq!(repo.staged().unwrap().len(), 1);
        assert!(repo.log().unwrap().is_empty());
    }

    #[test]
    fn identical_commits_collide_safely() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "same");
        repo.add("a.txt").unwrap();
        let first = repo.commit("dup").unwrap();

        // Storing the identical record again is a no-op.
        assert!(!repo.store.save_commit(&first.commit).unwrap());
        assert_eq!(repo.log().unwrap().len(), 1);
    }

    #[test]
    fn log_lists_newest_first() {
        let (_dir, repo) = setup();
        assert!(repo.log().unwrap().is_empty());

        for (i, msg) in ["one", "two", "three"].iter().enumerate() {
            write(&repo, "a.txt", &format!("v{i}"));
            repo.add("a.txt").unwrap();
            repo.commit(msg).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let messages: Vec<_> = repo
            .log()
            .unwrap()
            .iter()
            .map(|c| c.message().to_string())
            .collect();
        assert_eq!(messages, vec!["three", "two", "one"]);
    }

    #[test]
    fn status_before_first_commit_lists_untracked() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "a");
        write(&repo, "b.txt", "b");
        repo.add("b.txt").unwrap();

        let status = repo.status().unwrap();
        assert_eq!(status.head, None);
        assert_eq!(status.staged, vec![path("b.txt")]);
        assert_eq!(status.untracked(), vec![&path("a.txt")]);
        assert!(!status.is_clean());
    }

    #[test]
    fn status_detects_modified_deleted_and_untracked() {
        let (_dir, repo) = setup();
        write(&repo, "keep.txt", "k");
        write(&repo, "edit.txt", "hello");
        write(&repo, "gone.txt", "g");
        for f in ["keep.txt", "edit.txt", "gone.txt"] {
            repo.add(f).unwrap();
        }
        repo.commit("base").unwrap();

        write(&repo, "edit.txt", "world");
        fs::remove_file(repo.root().join("gone.txt")).unwrap();
        write(&repo, "new.txt", "n");

        let status = repo.status().unwrap();
        let r = &status.reconciliation;
        assert!(r.modified.contains(&path("edit.txt")));
        assert!(r.deleted.contains(&path("gone.txt")));
        assert!(r.added.contains(&path("new.txt")));
        assert!(r.unchanged.contains(&path("keep.txt")));
        assert_eq!(status.changes.len(), 1);
        assert_eq!(
            status.changes[0].diff.ops,
            vec![DiffOp::Removed("hello".into()), DiffOp::Added("world".into())]
        );
        let hunks = &status.changes[0].hunks;
        assert_eq!(hunks.len(), 1);
        assert_eq!((hunks[0].old_start, hunks[0].new_start), (1, 1));
        assert_eq!(hunks[0].lines, status.changes[0].diff.ops);
    }

    #[test]
    fn status_of_untouched_tree_is_clean() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "a");
        repo.add("a.txt").unwrap();
        repo.commit("c").unwrap();
        assert!(repo.status().unwrap().is_clean());
    }

    #[test]
    fn status_with_dangling_head_is_storage_error() {
        let (dir, repo) = setup();
        fs::write(dir.path().join(".mvc/HEAD"), "ab".repeat(32)).unwrap();
        assert!(matches!(repo.status(), Err(SdkError::Storage(_))));
    }

    #[test]
    fn modify_status_then_checkout_restores() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "hello");
        repo.add("a.txt").unwrap();
        let first = repo.commit("first").unwrap().commit;

        write(&repo, "a.txt", "world");
        let status = repo.status().unwrap();
        assert_eq!(
            status.reconciliation.modified.iter().collect::<Vec<_>>(),
            vec![&path("a.txt")]
        );

        let mut answers = Answers::new(&[true]);
        let report = repo
            .checkout(&repo.short_id(&first.id()), &mut answers)
            .unwrap();

        assert_eq!(answers.asked, vec![path("a.txt")]);
        assert_eq!(report.files, vec![(path("a.txt"), FileOutcome::Overwritten)]);
        assert_eq!(read(&repo, "a.txt"), "hello");
        assert!(repo.status().unwrap().is_clean());
    }

    #[test]
    fn declined_checkout_keeps_file_and_moves_head() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "v1");
        repo.add("a.txt").unwrap();
        let first = repo.commit("first").unwrap().commit;
        write(&repo, "a.txt", "v2");
        repo.add("a.txt").unwrap();
        let second = repo.commit("second").unwrap().commit;
        assert_eq!(repo.store.read_head().unwrap(), Some(second.id()));

        let mut answers = Answers::new(&[]);
        repo.checkout(&first.id().to_hex(), &mut answers).unwrap();

        assert_eq!(read(&repo, "a.txt"), "v2");
        assert_eq!(repo.store.read_head().unwrap(), Some(first.id()));
    }

    #[test]
    fn checkout_of_identical_file_does_not_prompt() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "same");
        repo.add("a.txt").unwrap();
        let c = repo.commit("c").unwrap().commit;

        let mut answers = Answers::new(&[true]);
        repo.checkout(&c.id().to_hex(), &mut answers).unwrap();
        assert!(answers.asked.is_empty());
    }

    #[test]
    fn checkout_restores_missing_nested_files_and_keeps_others() {
        let (dir, repo) = setup();
        write(&repo, "src/deep/a.txt", "nested");
        repo.add("src/deep/a.txt").unwrap();
        let c = repo.commit("nested").unwrap().commit;

        fs::remove_dir_all(dir.path().join("src")).unwrap();
        write(&repo, "other.txt", "untouched");

        let mut answers = Answers::new(&[]);
        repo.checkout(&c.id().to_hex()[..7], &mut answers).unwrap();
        assert_eq!(read(&repo, "src/deep/a.txt"), "nested");
        assert_eq!(read(&repo, "other.txt"), "untouched");
        assert!(answers.asked.is_empty());
    }

    #[test]
    fn checkout_unknown_prefix_is_ambiguous_or_not_found() {
        let (_dir, repo) = setup();
        let mut answers = Answers::new(&[]);
        assert!(matches!(
            repo.checkout("deadbeef", &mut answers),
            Err(SdkError::AmbiguousOrNotFound { matches: 0, .. })
        ));
        assert!(matches!(
            repo.checkout("", &mut answers),
            Err(SdkError::AmbiguousOrNotFound { .. })
        ));
    }

    #[test]
    fn commands_fail_outside_a_repository() {
        let (dir, repo) = setup();
        fs::remove_dir_all(dir.path().join(".mvc")).unwrap();
        write(&repo, "a.txt", "a");
        assert!(matches!(repo.add("a.txt"), Err(SdkError::NotARepository { .. })));
        assert!(matches!(repo.log(), Err(SdkError::NotARepository { .. })));
        assert!(matches!(repo.status(), Err(SdkError::NotARepository { .. })));
    }
}
