//! Polymorphic index shapes
//!
//! The indexing operators of [`Batch`](super::Batch) dispatch on the shape of
//! the index: a string key, a single integer, a homogeneous list of keys, or
//! a coordinate list mixing integers and ranges. `Index` models that dispatch
//! explicitly; `From` conversions keep call sites terse.

/// One coordinate of a multi-dimensional index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coord {
    /// Select a single element (negative counts from the end)
    At(isize),
    /// Select a range of elements; `None` bounds mean "from the start" /
    /// "to the end", out-of-range bounds clamp
    Range {
        /// Inclusive start bound
        start: Option<isize>,
        /// Exclusive end bound
        end: Option<isize>,
    },
}

impl Coord {
    /// The full-range coordinate (`:`), selecting every element
    pub fn full() -> Coord {
        Coord::Range {
            start: None,
            end: None,
        }
    }

    /// A bounded range coordinate
    pub fn range(start: isize, end: isize) -> Coord {
        Coord::Range {
            start: Some(start),
            end: Some(end),
        }
    }
}

impl From<isize> for Coord {
    fn from(i: isize) -> Self {
        Coord::At(i)
    }
}

impl From<std::ops::Range<isize>> for Coord {
    fn from(r: std::ops::Range<isize>) -> Self {
        Coord::range(r.start, r.end)
    }
}

impl From<std::ops::RangeFull> for Coord {
    fn from(_: std::ops::RangeFull) -> Self {
        Coord::full()
    }
}

/// A polymorphic index into a [`Batch`](super::Batch)
#[derive(Clone, Debug, PartialEq)]
pub enum Index {
    /// The identity index: resolves to the batch itself
    Identity,
    /// A string key, with dot-path traversal on miss
    Key(String),
    /// A single integer, broadcast element-wise across all members
    At(isize),
    /// A list of keys, selecting a sub-batch
    Keys(Vec<String>),
    /// A coordinate list, broadcast element-wise as a multi-dimensional index
    Coords(Vec<Coord>),
}

impl From<&str> for Index {
    fn from(key: &str) -> Self {
        Index::Key(key.to_string())
    }
}

impl From<String> for Index {
    fn from(key: String) -> Self {
        Index::Key(key)
    }
}

impl From<isize> for Index {
    fn from(i: isize) -> Self {
        Index::At(i)
    }
}

impl From<i32> for Index {
    fn from(i: i32) -> Self {
        Index::At(i as isize)
    }
}

impl From<Vec<String>> for Index {
    fn from(keys: Vec<String>) -> Self {
        Index::Keys(keys)
    }
}

impl From<Vec<&str>> for Index {
    fn from(keys: Vec<&str>) -> Self {
        Index::Keys(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Index {
    fn from(keys: &[&str]) -> Self {
        Index::Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Index {
    fn from(keys: [&str; N]) -> Self {
        Index::Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<Vec<isize>> for Index {
    fn from(indices: Vec<isize>) -> Self {
        Index::Coords(indices.into_iter().map(Coord::At).collect())
    }
}

impl From<Vec<Coord>> for Index {
    fn from(coords: Vec<Coord>) -> Self {
        Index::Coords(coords)
    }
}

impl<const N: usize> From<[Coord; N]> for Index {
    fn from(coords: [Coord; N]) -> Self {
        Index::Coords(coords.to_vec())
    }
}

use super::Batch;
use crate::error::{Error, Result};
use crate::value::Value;

impl Batch {
    /// Polymorphic read access
    ///
    /// Dispatches on the index shape:
    /// - [`Index::Identity`] returns a clone of the batch itself.
    /// - [`Index::Key`] returns the stored value; an absent key containing
    ///   `"."` is retried as a dot-path; an absent key with a default factory
    ///   configured yields the factory's value; otherwise [`Error::KeyNotFound`]
    ///   enumerating the available keys.
    /// - [`Index::At`] returns a new batch with every member element-indexed.
    /// - [`Index::Keys`] returns a new batch restricted to those keys; dotted
    ///   keys land as flat dotted keys in the result.
    /// - [`Index::Coords`] broadcasts a multi-dimensional index element-wise.
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let batch = Batch::from_pairs([("a", 1), ("b", 2)]);
    /// let pair = batch.get(["a", "b"])?;
    /// assert_eq!(pair.get("a")?, Value::Int(1));
    /// assert_eq!(pair.get("b")?, Value::Int(2));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn get<I: Into<Index>>(&self, index: I) -> Result<Value> {
        match index.into() {
            Index::Identity => Ok(Value::Batch(self.clone())),
            Index::Key(key) => self.get_key(&key),
            Index::At(i) => Ok(Value::Batch(self.index_members(&[Coord::At(i)])?)),
            Index::Keys(keys) => {
                let mut out = Batch::new();
                for key in &keys {
                    let value = self.get_key(key)?;
                    out.set_key(key, value);
                }
                Ok(Value::Batch(out))
            }
            Index::Coords(coords) => {
                if coords.is_empty() {
                    return Err(Error::UnsupportedIndex {
                        found: "empty coordinate list".to_string(),
                    });
                }
                Ok(Value::Batch(self.index_members(&coords)?))
            }
        }
    }

    /// Mutable key access
    ///
    /// Resolves like [`Batch::get`] restricted to string keys, but a missing
    /// key with a default factory configured is materialized: the factory's
    /// value is stored under the key and borrowed back.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value> {
        if !self.entries.contains_key(key) {
            if let Some((root, rest)) = key.split_once('.') {
                let descend = matches!(self.entries.get(root), Some(Value::Batch(sub)) if sub.resolves_key(rest));
                if descend {
                    let Some(Value::Batch(sub)) = self.entries.get_mut(root) else {
                        unreachable!("descend checked the nested batch");
                    };
                    return sub.get_mut(rest);
                }
            }
            match &self.default {
                Some(factory) => {
                    let value = factory();
                    self.entries.insert(key.to_string(), value);
                }
                None => return Err(self.key_not_found(key)),
            }
        }
        Ok(self
            .entries
            .get_mut(key)
            .expect("key was just checked or inserted"))
    }

    /// Resolve a string key, with dot-path traversal and the default factory
    pub(crate) fn get_key(&self, key: &str) -> Result<Value> {
        if let Some(value) = self.entries.get(key) {
            return Ok(value.clone());
        }
        if let Some((root, rest)) = key.split_once('.') {
            if let Ok(Value::Batch(sub)) = self.get_key(root) {
                if let Ok(value) = sub.get_key(rest) {
                    return Ok(value);
                }
            }
        }
        if let Some(factory) = &self.default {
            return Ok(factory());
        }
        Err(self.key_not_found(key))
    }

    /// Whether a key resolves without invoking the default factory
    pub(crate) fn resolves_key(&self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return true;
        }
        match key.split_once('.') {
            Some((root, rest)) => match self.entries.get(root) {
                Some(Value::Batch(sub)) => sub.resolves_key(rest),
                _ => false,
            },
            None => false,
        }
    }

    /// Element-index every member, producing a new batch
    pub(crate) fn index_members(&self, coords: &[Coord]) -> Result<Batch> {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            out.insert(key.clone(), value.index_coords(coords)?);
        }
        Ok(out)
    }

    /// Polymorphic assignment, mirroring the [`Batch::get`] dispatch
    ///
    /// - A string key sets the value, descending dot-paths into an existing
    ///   nested batch and falling back to the flat key otherwise.
    /// - An integer or coordinate index requires `value` to be a batch and
    ///   replaces every member with the value's same-key member, indexed.
    /// - A key list requires `value` to be a batch and copies the named keys.
    /// - [`Index::Identity`] is not assignable.
    pub fn set<I: Into<Index>>(&mut self, index: I, value: Value) -> Result<()> {
        match index.into() {
            Index::Identity => Err(Error::UnsupportedIndex {
                found: "assignment through the identity index".to_string(),
            }),
            Index::Key(key) => {
                self.set_key(&key, value);
                Ok(())
            }
            Index::At(i) => self.set_indexed(&[Coord::At(i)], &value),
            Index::Coords(coords) => self.set_indexed(&coords, &value),
            Index::Keys(keys) => {
                let Value::Batch(source) = &value else {
                    return Err(Error::Invariant {
                        msg: "key-list assignment requires a batch value".to_string(),
                    });
                };
                for key in &keys {
                    let member = source.get_key(key)?;
                    self.set_key(key, member);
                }
                Ok(())
            }
        }
    }

    /// Set a string key, descending dot-paths into existing nested batches
    pub(crate) fn set_key(&mut self, key: &str, value: Value) {
        if let Some((root, rest)) = key.split_once('.') {
            if let Some(Value::Batch(sub)) = self.entries.get_mut(root) {
                sub.set_key(rest, value);
                return;
            }
        }
        self.entries.insert(key.to_string(), value);
    }

    /// Replace every member with the value's same-key member, indexed
    fn set_indexed(&mut self, coords: &[Coord], value: &Value) -> Result<()> {
        let Value::Batch(source) = value else {
            return Err(Error::Invariant {
                msg: "indexed assignment requires a batch value".to_string(),
            });
        };
        let keys: Vec<String> = self.keys().map(str::to_string).collect();
        for key in keys {
            let member = source.get_key(&key)?;
            let indexed = member.index_coords(coords)?;
            self.entries.insert(key, indexed);
        }
        Ok(())
    }

    /// Remove the entry under a string key
    ///
    /// Only string keys are removable; the remaining entries keep their order.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        self.pop(key)
    }

    /// Containment check
    ///
    /// A key is reported absent both when it does not resolve and when its
    /// resolved value is empty (length zero). Present scalar values always
    /// count as contained.
    pub fn contains(&self, key: &str) -> bool {
        match self.get_key(key) {
            Ok(value) => !value.is_empty(),
            Err(_) => false,
        }
    }
}
