//! The multi-valued string map that query strings parse into.
//!
//! Keys are kept sorted so that [`QueryValues::encode`] is deterministic;
//! values keep their order within a key.

use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A mapping from key to an ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryValues {
    inner: BTreeMap<String, Vec<String>>,
}

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `application/x-www-form-urlencoded` text. A leading `?` is
    /// ignored; repeated keys accumulate values in order.
    ///
    /// ```
    /// use qstring::QueryValues;
    ///
    /// let values = QueryValues::parse("?fields=a&fields=b&name=two+words");
    /// assert_eq!(values.get_all("fields").unwrap(), ["a", "b"]);
    /// assert_eq!(values.get("name"), Some("two words"));
    /// ```
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            values.add(key, value);
        }
        values
    }

    /// Render as `key=value&key=value`, keys ascending. Keys bound to an
    /// empty list produce nothing.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, list) in &self.inner {
            for value in list {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// First value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|list| list.first())
            .map(String::as_str)
    }

    /// Every value bound to `key`, in order. `Some(&[])` when the key is
    /// present with no values.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Replace the values bound to `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Append a value to the list bound to `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replace the whole list bound to `key`.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.inner.insert(key.into(), values)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    /// Copy every key of `other` into `self`. On collision `other` wins.
    pub fn merge(&mut self, other: QueryValues) {
        for (key, list) in other.inner {
            if self.inner.contains_key(&key) {
                log::debug!("qstring: merge overwrote key {key:?}");
            }
            self.inner.insert(key, list);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.inner
    }
}

impl fmt::Display for QueryValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<'a> IntoIterator for &'a QueryValues {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl IntoIterator for QueryValues {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Build from `(key, values)` pairs. A repeated key appends to its list.
///
/// ```
/// use qstring::QueryValues;
///
/// let values = QueryValues::from_iter([("page", vec!["1"]), ("fields", vec!["a", "b"])]);
/// assert_eq!(values.get("page"), Some("1"));
/// ```
impl<K, V, S> FromIterator<(K, V)> for QueryValues
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, list) in iter {
            let entry = values.inner.entry(key.into()).or_default();
            entry.extend(list.into_iter().map(Into::into));
        }
        values
    }
}

impl From<BTreeMap<String, Vec<String>>> for QueryValues {
    fn from(inner: BTreeMap<String, Vec<String>>) -> Self {
        Self { inner }
    }
}

impl From<HashMap<String, Vec<String>>> for QueryValues {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self {
            inner: map.into_iter().collect(),
        }
    }
}
