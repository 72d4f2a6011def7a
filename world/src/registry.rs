//! Id-indexed entity storage shared by every collection of the graph.

use std::collections::BTreeMap;

use sprout_core::{BranchId, FlowerId, LeafClusterId, LeafId, PetalId, PlantId};

/// Identifier types that can key a [`Registry`].
pub(crate) trait RegistryKey: Copy + Ord {
    fn from_raw(value: u32) -> Self;
    fn raw(self) -> u32;
}

macro_rules! registry_key {
    ($($id:ty),* $(,)?) => {
        $(
            impl RegistryKey for $id {
                fn from_raw(value: u32) -> Self {
                    <$id>::new(value)
                }

                fn raw(self) -> u32 {
                    self.get()
                }
            }
        )*
    };
}

registry_key!(PlantId, BranchId, LeafClusterId, FlowerId, LeafId, PetalId);

/// Registry that stores one entity kind and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct Registry<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K: RegistryKey, V> Registry<K, V> {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Next identifier: one past the largest live identifier, starting at 1.
    pub(crate) fn allocate(&self) -> K {
        let highest = self
            .entries
            .last_key_value()
            .map_or(0, |(key, _)| key.raw());
        K::from_raw(highest.saturating_add(1))
    }

    /// Stores `value` under a freshly allocated identifier.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(K) -> V) -> K {
        let id = self.allocate();
        let _ = self.entries.insert(id, build(id));
        id
    }

    pub(crate) fn get(&self, id: K) -> Option<&V> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: K) -> Option<&mut V> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: K) -> Option<V> {
        self.entries.remove(&id)
    }

    pub(crate) fn contains(&self, id: K) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}
