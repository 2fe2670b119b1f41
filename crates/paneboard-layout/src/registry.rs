//! Path-keyed registry for per-panel runtime state (mounted chart handles,
//! series caches).
//!
//! Entries are keyed by [`PanelPath`] value, so a path rebuilt from an
//! interaction event finds the entry registered at mount time.

use rustc_hash::FxHashMap;

use crate::path::PanelPath;

/// Whether [`PanelRegistry::add_or_update`] inserted or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryUpdate {
    Added,
    Updated,
}

/// Registry of values keyed by panel path.
#[derive(Debug, Clone)]
pub struct PanelRegistry<T> {
    entries: FxHashMap<PanelPath, T>,
}

impl<T> Default for PanelRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PanelRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Insert `value` for `path`, replacing any existing entry.
    pub fn add_or_update(&mut self, path: PanelPath, value: T) -> RegistryUpdate {
        let update = if self.entries.contains_key(&path) {
            RegistryUpdate::Updated
        } else {
            RegistryUpdate::Added
        };
        tracing::info!(
            target: "paneboard.registry",
            path = %path,
            ?update,
            "panel registered"
        );
        self.entries.insert(path, value);
        update
    }

    /// Merge into an existing entry with `merge`, or insert `value`.
    pub fn add_or_merge(
        &mut self,
        path: PanelPath,
        value: T,
        merge: impl FnOnce(&mut T, T),
    ) -> RegistryUpdate {
        match self.entries.get_mut(&path) {
            Some(existing) => {
                merge(existing, value);
                RegistryUpdate::Updated
            }
            None => {
                self.entries.insert(path, value);
                RegistryUpdate::Added
            }
        }
    }

    #[must_use]
    pub fn get(&self, path: &PanelPath) -> Option<&T> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &PanelPath) -> Option<&mut T> {
        self.entries.get_mut(path)
    }

    #[must_use]
    pub fn contains(&self, path: &PanelPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Remove and return the entry for `path`.
    pub fn remove(&mut self, path: &PanelPath) -> Option<T> {
        let removed = self.entries.remove(path);
        if removed.is_some() {
            tracing::info!(target: "paneboard.registry", path = %path, "panel unregistered");
        }
        removed
    }

    /// Remove every entry at or below `prefix`.
    pub fn remove_subtree(&mut self, prefix: &PanelPath) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| !prefix.is_prefix_of(path));
        before - self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by path.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&PanelPath, &T)> {
        let mut out: Vec<_> = self.entries.iter().collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_update() {
        let mut reg = PanelRegistry::new();
        assert_eq!(
            reg.add_or_update(PanelPath::from([0, 1, 0]), "a"),
            RegistryUpdate::Added
        );
        assert_eq!(
            reg.add_or_update(PanelPath::from([0, 1, 0]), "b"),
            RegistryUpdate::Updated
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(&PanelPath::from([0, 1, 0])), Some(&"b"));
    }

    #[test]
    fn merge_keeps_existing_state() {
        let mut reg = PanelRegistry::new();
        reg.add_or_merge(PanelPath::from([0]), vec![1], |old, new| old.extend(new));
        let update = reg.add_or_merge(PanelPath::from([0]), vec![2], |old, new| old.extend(new));
        assert_eq!(update, RegistryUpdate::Updated);
        assert_eq!(reg.get(&PanelPath::from([0])), Some(&vec![1, 2]));
    }

    #[test]
    fn remove_and_subtree_removal() {
        let mut reg = PanelRegistry::new();
        for path in [[0, 1, 0], [0, 1, 1], [0, 0, 0]] {
            reg.add_or_update(PanelPath::from(path), ());
        }
        assert_eq!(reg.remove(&PanelPath::from([0, 0, 0])), Some(()));
        assert_eq!(reg.remove(&PanelPath::from([0, 0, 0])), None);
        assert_eq!(reg.remove_subtree(&PanelPath::from([0, 1])), 2);
        assert!(reg.is_empty());
    }

    #[test]
    fn entries_are_sorted_by_path() {
        let mut reg = PanelRegistry::new();
        reg.add_or_update(PanelPath::from([0, 2]), 'c');
        reg.add_or_update(PanelPath::from([0, 0]), 'a');
        reg.add_or_update(PanelPath::from([0, 1]), 'b');
        let values: Vec<char> = reg.sorted_entries().into_iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!['a', 'b', 'c']);
    }
}
