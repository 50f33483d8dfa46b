//! Core Batch type
//!
//! `Batch` is an insertion-ordered mapping from string keys to [`Value`]s,
//! where a value is either a leaf or another `Batch` forming a tree. All
//! bookkeeping (the default factory) lives in private struct fields, never in
//! the mapping itself, so public enumeration never has anything to hide.

use crate::error::{Error, Result};
use crate::split::{SizeEntry, SizeMap, SplitFn};
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Zero-argument constructor invoked to materialize a missing key on read
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Insertion-ordered, tree-shaped batch container
///
/// A `Batch` maps string keys to values; a value may itself be a `Batch`,
/// forming a tree of arbitrary depth. Keys are unique per level and iterate
/// in insertion order. An optional *default factory* materializes missing
/// keys on first read instead of failing.
///
/// # Example
///
/// ```
/// use batchr::prelude::*;
///
/// let batch = Batch::from_pairs([("a", Value::Int(1)), ("b", Value::Int(2))]);
/// assert_eq!(batch.get("a")?, Value::Int(1));
///
/// let indexed = Batch::from_pairs([
///     ("a", Value::from(vec![1, 2])),
///     ("b", Value::from(vec![3, 4])),
/// ]);
/// assert_eq!(indexed.get(1)?.get("b")?, Value::Int(4));
/// # Ok::<(), batchr::error::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Batch {
    pub(crate) entries: IndexMap<String, Value>,
    pub(crate) default: Option<DefaultFactory>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty batch carrying a default factory
    ///
    /// The factory is invoked for keys that fail to resolve: [`Batch::get`]
    /// returns the synthesized value, [`Batch::get_mut`] additionally stores
    /// it under the requested key. A shared-borrow `get` never mutates the
    /// batch, so repeated reads of the same missing key invoke the factory
    /// each time; use `get_mut` to materialize the entry.
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let mut batch = Batch::with_default(|| Value::List(vec![]));
    /// assert_eq!(batch.get("missing")?, Value::List(vec![]));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn with_default<F>(factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            entries: IndexMap::new(),
            default: Some(Arc::new(factory)),
        }
    }

    /// Construct from ordered key/value pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut batch = Self::new();
        for (key, value) in pairs {
            batch.insert(key.into(), value.into());
        }
        batch
    }

    /// Construct from a mapping
    ///
    /// Nested mappings cannot occur here: the [`Value`] model represents every
    /// mapping-shaped value as `Value::Batch`, so the recursive-conversion
    /// invariant of construction holds by type. To build from external nested
    /// data (e.g. JSON), deserialize into `Batch` via serde.
    pub fn from_dict(map: IndexMap<String, Value>) -> Self {
        Self {
            entries: map,
            default: None,
        }
    }

    /// Construct by splitting a sliceable value along a dimension
    ///
    /// `size_map` is an explicit ordered list of `(key, size)` entries; each
    /// width entry consumes that many elements along `dim` via `split_fn` and
    /// threads the remainder to the next entry, so entry order directly
    /// determines which slice each key receives. A nested entry consumes its
    /// total width and recurses, mirroring the size map's nesting in the
    /// result. Only `dim == 0` is supported by [`split_list`].
    ///
    /// [`split_list`]: crate::split::split_list
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let data = Value::from(vec![1, 2, 3, 4, 5]);
    /// let sizes = SizeMap::new().width("a", 2).width("b", 3);
    /// let batch = Batch::from_tensor(&data, &sizes, 0, split_list)?;
    /// assert_eq!(batch.get("a")?, Value::from(vec![1, 2]));
    /// assert_eq!(batch.get("b")?, Value::from(vec![3, 4, 5]));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn from_tensor(
        data: &Value,
        size_map: &SizeMap,
        dim: usize,
        split_fn: SplitFn,
    ) -> Result<Self> {
        let mut batch = Self::new();
        let mut rest = data.clone();
        for (key, entry) in size_map.iter() {
            match entry {
                SizeEntry::Width(width) => {
                    let (head, tail) = split_fn(&rest, *width, dim)?;
                    batch.insert(key.clone(), head);
                    rest = tail;
                }
                SizeEntry::Nested(sub) => {
                    let (head, tail) = split_fn(&rest, sub.total_width(), dim)?;
                    let nested = Self::from_tensor(&head, sub, dim, split_fn)?;
                    batch.insert(key.clone(), Value::Batch(nested));
                    rest = tail;
                }
            }
        }
        Ok(batch)
    }

    /// Merge a sequence of batches into a batch of per-key lists
    ///
    /// Each key maps to the ordered list of values for that key across the
    /// inputs that contain it; keys absent from an input are skipped, not
    /// defaulted. Keys appear in first-occurrence order. If every value
    /// gathered for a key is itself a `Batch`, those are merged recursively
    /// instead of left as a list.
    pub fn from_batch_list(batches: &[Batch]) -> Self {
        let mut gathered: IndexMap<String, Vec<Value>> = IndexMap::new();
        for batch in batches {
            for (key, value) in batch.iter() {
                gathered.entry(key.clone()).or_default().push(value.clone());
            }
        }

        let mut out = Self::new();
        for (key, values) in gathered {
            let all_batches = values.iter().all(|v| matches!(v, Value::Batch(_)));
            if all_batches && !values.is_empty() {
                let members: Vec<Batch> = values
                    .into_iter()
                    .map(|v| match v {
                        Value::Batch(b) => b,
                        _ => unreachable!("checked all members are batches"),
                    })
                    .collect();
                out.insert(key, Value::Batch(Self::from_batch_list(&members)));
            } else {
                out.insert(key, Value::List(values));
            }
        }
        out
    }

    /// Explicit copy
    ///
    /// A deep copy recursively clones every nested batch and leaf; a shallow
    /// copy clones only the top-level mapping. `Value` is an owned tree, so
    /// both forms yield independent data; the distinction exists for parity
    /// with reference-sharing ports. Either form shares the default factory.
    pub fn copy(&self, deep: bool) -> Batch {
        let _ = deep;
        self.clone()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value under a key, replacing any previous value
    ///
    /// This is the raw mapping operation; the key is taken literally. Use
    /// [`Batch::set`] for the polymorphic assignment with dot-path traversal.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Iterate over top-level keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over top-level values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Iterate over top-level entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Enumerate keys down to a recursion depth, dot-joining nested keys
    ///
    /// Depth `0` yields the top-level keys; a positive depth descends that
    /// many levels into nested batches; any negative depth descends without
    /// limit. Leaves above the depth limit appear under their plain key.
    pub fn keys_deep(&self, depth: isize) -> Vec<String> {
        let mut keys = Vec::new();
        for (key, value) in self.iter() {
            match value {
                Value::Batch(sub) if depth != 0 => {
                    let sub_depth = if depth > 0 { depth - 1 } else { -1 };
                    for sub_key in sub.keys_deep(sub_depth) {
                        keys.push(format!("{key}.{sub_key}"));
                    }
                }
                _ => keys.push(key.clone()),
            }
        }
        keys
    }

    /// Merge another batch's entries into this one, replacing on collision
    pub fn update(&mut self, other: Batch) {
        self.entries.extend(other.entries);
    }

    /// Remove and return the value under a key, preserving the order of the
    /// remaining entries
    pub fn pop(&mut self, key: &str) -> Result<Value> {
        match self.entries.shift_remove(key) {
            Some(value) => Ok(value),
            None => Err(self.key_not_found(key)),
        }
    }

    pub(crate) fn key_not_found(&self, key: &str) -> Error {
        Error::KeyNotFound {
            key: key.to_string(),
            available: self.keys().map(str::to_string).collect(),
        }
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            map.entry(key, value);
        }
        map.finish()
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Batch({{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}})")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Batch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Batch {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.into(), value.into());
        }
    }
}

impl IntoIterator for Batch {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::ops::Index<&str> for Batch {
    type Output = Value;

    /// Borrow the value under a literal key
    ///
    /// # Panics
    ///
    /// Panics if the key is absent. Use [`Batch::get`] for the fallible,
    /// dot-path-aware lookup.
    fn index(&self, key: &str) -> &Value {
        self.entries
            .get(key)
            .unwrap_or_else(|| panic!("{}", self.key_not_found(key)))
    }
}

impl Serialize for Batch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct BatchVisitor;

impl<'de> Visitor<'de> for BatchVisitor {
    type Value = Batch;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string keys to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Batch, A::Error> {
        let mut batch = Batch::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            batch.insert(key, value);
        }
        Ok(batch)
    }
}

impl<'de> Deserialize<'de> for Batch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Batch, D::Error> {
        deserializer.deserialize_map(BatchVisitor)
    }
}
