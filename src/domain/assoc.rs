//! The association-list contract shared by [`OrderedMap`] and [`IndexedMap`].
//!
//! Backings only provide storage (`put`, `get`, `remove`, ...). Template
//! formatting and the text codec are provided methods, so every backing
//! serializes identically.
//!
//! [`OrderedMap`]: crate::domain::OrderedMap
//! [`IndexedMap`]: crate::domain::IndexedMap

use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::error::{MapError, MapResult};
use crate::domain::escape::{escape, unescape};
use crate::domain::template;

/// Separator between keys and values in the default text form.
pub const KEY_SEPARATOR: &str = "=";

/// Separator between entries in the default text form.
pub const PAIR_SEPARATOR: &str = " ";

/// A validated, non-empty delimiter for the delimited text form.
///
/// Must not contain `%`, `u`, `0-9` or `A-F`: escaping emits those for any
/// input, so they could appear in exported text even when no key or value
/// contains the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiter(String);

fn is_escape_output(c: char) -> bool {
    matches!(c, '%' | 'u' | '0'..='9' | 'A'..='F')
}

impl Delimiter {
    pub fn new(delim: impl Into<String>) -> MapResult<Self> {
        let delim = delim.into();
        if delim.is_empty() {
            return Err(MapError::EmptyDelimiter);
        }
        if let Some(reserved) = delim.chars().find(|&c| is_escape_output(c)) {
            return Err(MapError::ReservedDelimiter { delim, reserved });
        }
        Ok(Self(delim))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered map from string keys to values.
///
/// Keys are unique: `put` on an existing key replaces the value in place and
/// keeps the entry's position.
pub trait AssocMap {
    type Value;

    /// Insert or replace. Returns the previous value for `key`, if any.
    fn put(&mut self, key: impl Into<String>, value: Self::Value) -> Option<Self::Value>;

    fn get(&self, key: &str) -> Option<&Self::Value>;

    /// Remove the entry for `key`. No-op when absent.
    fn remove(&mut self, key: &str) -> Option<Self::Value>;

    fn len(&self) -> usize;

    fn clear(&mut self);

    /// Entries in insertion order.
    fn entries(&self) -> impl Iterator<Item = (&str, &Self::Value)> + '_;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for `key`, or `default` when the key is absent.
    fn get_or<'a>(&'a self, key: &str, default: &'a Self::Value) -> &'a Self::Value {
        self.get(key).unwrap_or(default)
    }

    /// Expand the template stored under `key` with `args` (see [`template::expand`]).
    fn format<S: AsRef<str>>(&self, key: &str, args: &[S]) -> MapResult<String>
    where
        Self::Value: AsRef<str>,
    {
        let text = self
            .get(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))?;
        template::expand(text.as_ref(), args)
    }

    /// Export as `key1=value1 key2=value2 ...` with escaped keys and values.
    fn export_to_string(&self) -> String
    where
        Self::Value: AsRef<str>,
    {
        self.entries()
            .map(|(k, v)| format!("{}{KEY_SEPARATOR}{}", escape(k), escape(v.as_ref())))
            .join(PAIR_SEPARATOR)
    }

    /// Export as `key1<d>value1<d>key2<d>value2 ...` with escaped keys and values.
    ///
    /// Only round-trips when no escaped key or value contains `delim`.
    fn export_to_string_delim(&self, delim: &Delimiter) -> String
    where
        Self::Value: AsRef<str>,
    {
        self.entries()
            .map(|(k, v)| format!("{}{delim}{}", escape(k), escape(v.as_ref())))
            .join(delim.as_str())
    }

    /// Import entries produced by [`AssocMap::export_to_string`].
    ///
    /// Parsing is lenient: a trailing segment without `=` is ignored.
    /// Returns the number of pairs read.
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    fn import_from_string(&mut self, text: &str) -> usize
    where
        Self::Value: From<String>,
    {
        self.import_from_pairs(split_pairs(text, KEY_SEPARATOR, PAIR_SEPARATOR))
    }

    /// Import entries produced by [`AssocMap::export_to_string_delim`].
    #[instrument(level = "debug", skip_all, fields(len = text.len(), delim = %delim))]
    fn import_from_string_delim(&mut self, text: &str, delim: &Delimiter) -> usize
    where
        Self::Value: From<String>,
    {
        self.import_from_pairs(split_pairs(text, delim.as_str(), delim.as_str()))
    }

    /// Bulk `put` of key/value pairs, in order. Returns the number of pairs.
    fn import_from_pairs<I, K, V>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self::Value>,
    {
        let mut count = 0;
        for (key, value) in pairs {
            self.put(key, value.into());
            count += 1;
        }
        debug!(count, "imported pairs");
        count
    }
}

/// Split `text` into unescaped `(key, value)` pairs.
///
/// From cursor `start`, the key runs to the next `key_sep`; the value runs to
/// the next `pair_sep` after that (or the end of `text`). Stops as soon as no
/// further `key_sep` is found.
pub(crate) fn split_pairs(text: &str, key_sep: &str, pair_sep: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut start = 0;

    while start <= text.len() {
        let Some(key_end) = text[start..].find(key_sep).map(|i| start + i) else {
            break;
        };
        let value_start = key_end + key_sep.len();
        let value_end = text[value_start..]
            .find(pair_sep)
            .map_or(text.len(), |i| value_start + i);

        pairs.push((
            unescape(&text[start..key_end]),
            unescape(&text[value_start..value_end]),
        ));
        start = value_end + pair_sep.len();
    }

    pairs
}
