use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use mvc_types::Fingerprint;

use crate::error::{StoreError, StoreResult};
use crate::object::{Commit, IndexRecord};
use crate::traits::RepositoryStore;

#[derive(Debug, Default)]
struct State {
    index: IndexRecord,
    commits: BTreeMap<Fingerprint, Commit>,
    head: Option<Fingerprint>,
}

/// In-memory repository store.
///
/// Intended for tests and embedding. `None` state means "not initialized".
/// Data is lost when the store is dropped.
pub struct InMemoryRepositoryStore {
    state: RwLock<Option<State>>,
}

impl InMemoryRepositoryStore {
    /// Create an uninitialized store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Create a store that is already initialized.
    pub fn initialized() -> Self {
        Self {
            state: RwLock::new(Some(State::default())),
        }
    }

    /// Number of stored commits (0 when uninitialized).
    pub fn commit_count(&self) -> usize {
        self.state
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map_or(0, |s| s.commits.len())
    }

    fn not_a_repository() -> StoreError {
        StoreError::NotARepository {
            root: PathBuf::from("<memory>"),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&State) -> T) -> StoreResult<T> {
        let guard = self.state.read().expect("lock poisoned");
        guard.as_ref().map(f).ok_or_else(Self::not_a_repository)
    }

    fn with_state_mut<T>(&self, f: impl FnOnce(&mut State) -> T) -> StoreResult<T> {
        let mut guard = self.state.write().expect("lock poisoned");
        guard.as_mut().map(f).ok_or_else(Self::not_a_repository)
    }
}

impl Default for InMemoryRepositoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryStore for InMemoryRepositoryStore {
    fn is_initialized(&self) -> bool {
        self.state.read().expect("lock poisoned").is_some()
    }

    fn initialize(&self) -> StoreResult<()> {
        let mut guard = self.state.write().expect("lock poisoned");
        if guard.is_some() {
            return Err(StoreError::AlreadyInitialized {
                root: PathBuf::from("<memory>"),
            });
        }
        *guard = Some(State::default());
        Ok(())
    }

    fn load_index(&self) -> StoreResult<IndexRecord> {
        self.with_state(|s| s.index.clone())
    }

    fn save_index(&self, index: &IndexRecord) -> StoreResult<()> {
        self.with_state_mut(|s| s.index = index.clone())
    }

    fn load_commit(&self, id: &Fingerprint) -> StoreResult<Option<Commit>> {
        self.with_state(|s| s.commits.get(id).cloned())
    }

    fn save_commit(&self, commit: &Commit) -> StoreResult<bool> {
        self.with_state_mut(|s| {
            if s.commits.contains_key(&commit.id()) {
                false
            } else {
                s.commits.insert(commit.id(), commit.clone());
                true
            }
        })
    }

    fn commit_ids(&self) -> StoreResult<Vec<Fingerprint>> {
        self.with_state(|s| s.commits.keys().copied().collect())
    }

    fn read_head(&self) -> StoreResult<Option<Fingerprint>> {
        self.with_state(|s| s.head)
    }

    fn write_head(&self, id: &Fingerprint) -> StoreResult<()> {
        self.with_state_mut(|s| s.head = Some(*id))
    }
}

impl std::fmt::Debug for InMemoryRepositoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepositoryStore")
            .field("initialized", &self.is_initialized())
            .field("commit_count", &self.commit_count())
            .finish()
    }
}
