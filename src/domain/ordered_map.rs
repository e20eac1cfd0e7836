use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::assoc::AssocMap;

/// An entry of an [`OrderedMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry<V> {
    pub key: String,
    pub value: V,
}

impl<V> MapEntry<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Association list with insertion order.
///
/// Every keyed operation is a linear scan and is O(n) in the number of
/// entries. Intended for small maps such as settings strings and message
/// tables; see [`IndexedMap`](crate::domain::IndexedMap) for larger ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V = String> {
    entries: Vec<MapEntry<V>>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Entry at insertion position `index`.
    pub fn get_entry(&self, index: usize) -> Option<&MapEntry<V>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MapEntry<V>> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|e| &e.value)
    }
}

impl<V> AssocMap for OrderedMap<V> {
    type Value = V;

    #[instrument(level = "trace", skip_all)]
    fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index_of(&key) {
            Some(i) => {
                debug!(key = %key, index = i, "replace");
                Some(std::mem::replace(&mut self.entries[i].value, value))
            }
            None => {
                debug!(key = %key, "append");
                self.entries.push(MapEntry::new(key, value));
                None
            }
        }
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.index_of(key).map(|i| &self.entries[i].value)
    }

    #[instrument(level = "trace", skip(self))]
    fn remove(&mut self, key: &str) -> Option<V> {
        let i = self.index_of(key)?;
        debug!(index = i, "remove");
        Some(self.entries.remove(i).value)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }
}

/// Debug listing `[key1=value1,key2=value2]`. Not escaped, so not importable.
impl<V: fmt::Display> fmt::Display for OrderedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.entries
                .iter()
                .map(|e| format!("{}={}", e.key, e.value))
                .join(",")
        )
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for OrderedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = &'a MapEntry<V>;
    type IntoIter = std::slice::Iter<'a, MapEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assoc::Delimiter;
    use crate::domain::error::MapError;

    fn sample() -> OrderedMap {
        [("a", "1"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect()
    }

    #[test]
    fn given_existing_key_when_put_then_replaces_in_place() {
        let mut map = sample();
        let old = map.put("a", "9".to_string());
        assert_eq!(old.as_deref(), Some("1"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a").map(String::as_str), Some("9"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn given_new_key_when_put_then_appends() {
        let mut map = sample();
        assert!(map.put("c", "3".into()).is_none());
        assert_eq!(map.get_entry(2), Some(&MapEntry::new("c", "3".to_string())));
    }

    #[test]
    fn given_missing_key_when_get_or_then_returns_default() {
        let map = sample();
        let fallback = "none".to_string();
        assert_eq!(map.get_or("zz", &fallback), "none");
        assert_eq!(map.get_or("b", &fallback), "2");
    }

    #[test]
    fn given_key_when_remove_then_excised_and_order_kept() {
        let mut map: OrderedMap = [("a", "1"), ("b", "2"), ("c", "3")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        assert_eq!(map.remove("b").as_deref(), Some("2"));
        assert!(map.remove("b").is_none());
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn given_map_when_clear_then_empty() {
        let mut map = sample();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.export_to_string(), "");
    }

    #[test]
    fn given_map_when_display_then_debug_listing() {
        assert_eq!(sample().to_string(), "[a=1,b=2]");
        assert_eq!(OrderedMap::<String>::new().to_string(), "[]");
    }

    #[test]
    fn given_values_with_separators_when_exported_then_escaped() {
        let mut map = OrderedMap::new();
        map.put("user name", "a=b c".to_string());
        assert_eq!(map.export_to_string(), "user%20name=a%3Db%20c");
    }

    #[test]
    fn given_exported_map_when_imported_then_same_entries_in_order() {
        let mut source = OrderedMap::new();
        source.put("zeta", "last letter".to_string());
        source.put("alpha", "x=y".to_string());
        source.put("pct", "100%".to_string());

        let mut target = OrderedMap::new();
        let read = target.import_from_string(&source.export_to_string());
        assert_eq!(read, 3);
        assert_eq!(target, source);
    }

    #[test]
    fn given_delimiter_when_exported_and_imported_then_round_trips() {
        let delim = Delimiter::new("|").unwrap();
        let source = sample();
        let text = source.export_to_string_delim(&delim);
        assert_eq!(text, "a|1|b|2");

        let mut target = OrderedMap::new();
        target.import_from_string_delim(&text, &delim);
        assert_eq!(target, source);
    }

    #[test]
    fn given_import_into_non_empty_map_then_puts_over_existing() {
        let mut map = sample();
        map.import_from_string("b=20 c=30");
        assert_eq!(map.to_string(), "[a=1,b=20,c=30]");
    }

    #[test]
    fn given_pairs_when_imported_then_put_in_order() {
        let mut map: OrderedMap = OrderedMap::new();
        let n = map.import_from_pairs([("x", "1"), ("y", "2"), ("x", "3")]);
        assert_eq!(n, 3);
        assert_eq!(map.to_string(), "[x=3,y=2]");
    }

    #[test]
    fn given_template_value_when_format_then_expanded() {
        let mut map = OrderedMap::new();
        map.put("greeting", "Hello {0}, you have {1} new messages".to_string());
        let text = map.format("greeting", &["Ann", "3"]).unwrap();
        assert_eq!(text, "Hello Ann, you have 3 new messages");
    }

    #[test]
    fn given_missing_key_when_format_then_key_not_found() {
        let map = sample();
        assert_eq!(
            map.format::<&str>("nope", &[]),
            Err(MapError::KeyNotFound("nope".into()))
        );
    }

    #[test]
    fn given_non_string_values_then_plain_operations_work() {
        let mut map: OrderedMap<u32> = OrderedMap::new();
        map.put("one", 1);
        map.put("two", 2);
        map.put("one", 11);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![11, 2]);
        assert_eq!(map.to_string(), "[one=11,two=2]");
    }
}
