//! The resource index: every known resource path and its load state.

use crate::store::DocumentStore;
use defstack_model::{DefRef, DefResult};
use std::collections::HashMap;

/// Load state of one resource.
#[derive(Debug, Clone)]
pub enum EntryState {
    /// Known to exist, not yet materialized.
    Unloaded,
    /// Materialization in progress further up the call stack.
    Loading,
    /// Materialized; every later request returns this instance.
    Loaded(DefRef),
}

impl EntryState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Path → state map, built once from a store scan.
///
/// Paths are never added or removed after construction. Entries only move
/// `Unloaded → Loading → Loaded`, or back to `Unloaded` when a load fails.
#[derive(Debug, Default)]
pub struct ResourceIndex {
    entries: HashMap<String, EntryState>,
}

impl ResourceIndex {
    /// Indexes every path the store reports, all `Unloaded`.
    pub fn build(store: &dyn DocumentStore) -> DefResult<Self> {
        Ok(Self::from_paths(store.scan()?))
    }

    pub fn from_paths(paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: paths
                .into_iter()
                .map(|path| (path, EntryState::Unloaded))
                .collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn state(&self, path: &str) -> Option<&EntryState> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.values().filter(|state| state.is_loaded()).count()
    }

    /// All indexed paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub(crate) fn begin(&mut self, path: &str) {
        if let Some(state) = self.entries.get_mut(path) {
            debug_assert!(matches!(state, EntryState::Unloaded));
            *state = EntryState::Loading;
        }
    }

    pub(crate) fn finish(&mut self, path: &str, def: DefRef) {
        if let Some(state) = self.entries.get_mut(path) {
            debug_assert!(matches!(state, EntryState::Loading));
            *state = EntryState::Loaded(def);
        }
    }

    pub(crate) fn abandon(&mut self, path: &str) {
        if let Some(state) = self.entries.get_mut(path) {
            debug_assert!(matches!(state, EntryState::Loading));
            *state = EntryState::Unloaded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defstack_model::{Def, impl_def};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct EmptyDef;

    impl_def!(EmptyDef {});

    fn index() -> ResourceIndex {
        ResourceIndex::from_paths(["b".to_owned(), "a/x".to_owned()])
    }

    #[test]
    fn starts_unloaded() {
        let index = index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.paths(), vec!["a/x", "b"]);
        assert!(matches!(index.state("b"), Some(EntryState::Unloaded)));
        assert!(index.state("c").is_none());
        assert_eq!(index.loaded_count(), 0);
    }

    #[test]
    fn transitions() {
        let mut index = index();
        index.begin("b");
        assert!(matches!(index.state("b"), Some(EntryState::Loading)));
        index.abandon("b");
        assert!(matches!(index.state("b"), Some(EntryState::Unloaded)));

        index.begin("b");
        let def: Arc<dyn Def> = Arc::new(EmptyDef);
        index.finish("b", def);
        assert!(index.state("b").is_some_and(EntryState::is_loaded));
        assert_eq!(index.loaded_count(), 1);
    }

    #[test]
    fn unknown_paths_are_ignored() {
        let mut index = index();
        index.begin("missing");
        assert!(!index.contains("missing"));
        assert_eq!(index.len(), 2);
    }
}
