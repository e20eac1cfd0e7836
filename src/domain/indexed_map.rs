use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::assoc::AssocMap;

/// Hash-indexed variant of [`OrderedMap`](crate::domain::OrderedMap).
///
/// Same contract and text form, O(1) average lookup. Removal shifts later
/// entries down to keep insertion order, so it stays O(n).
#[derive(Debug, Clone)]
pub struct IndexedMap<V = String> {
    entries: IndexMap<String, V>,
}

/// Equal when entries match pairwise in insertion order.
impl<V: PartialEq> PartialEq for IndexedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl<V: Eq> Eq for IndexedMap<V> {}

impl<V> Default for IndexedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IndexedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Entry at insertion position `index`.
    pub fn get_entry(&self, index: usize) -> Option<(&str, &V)> {
        self.entries.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }
}

impl<V> AssocMap for IndexedMap<V> {
    type Value = V;

    #[instrument(level = "trace", skip_all)]
    fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        debug!(key = %key, "put");
        self.entries.insert(key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    #[instrument(level = "trace", skip(self))]
    fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.shift_remove(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: fmt::Display> fmt::Display for IndexedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.entries.iter().map(|(k, v)| format!("{k}={v}")).join(",")
        )
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for IndexedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for IndexedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}
