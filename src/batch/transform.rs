//! Bulk transforms
//!
//! Every transform here allocates a new batch and recurses into nested
//! batches, applying the same transform at every level of the tree.

use super::{Batch, Index};
use crate::error::{Error, Result};
use crate::value::Value;
use glob::Pattern;
use indexmap::IndexMap;

impl Batch {
    /// Replace every leaf value `v` with `fn(v)`
    ///
    /// Nested batches are recursed into, not passed to the function.
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let batch = Batch::from_pairs([("a", 1), ("b", 2)]);
    /// let doubled = batch.map(|v| match v {
    ///     Value::Int(i) => Value::Int(i * 2),
    ///     other => other.clone(),
    /// });
    /// assert_eq!(doubled.get("b")?, Value::Int(4));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn map<F>(&self, f: F) -> Batch
    where
        F: Fn(&Value) -> Value,
    {
        self.map_inner(&f)
    }

    fn map_inner<F>(&self, f: &F) -> Batch
    where
        F: Fn(&Value) -> Value,
    {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let mapped = match value {
                Value::Batch(sub) => Value::Batch(sub.map_inner(f)),
                leaf => f(leaf),
            };
            out.insert(key.clone(), mapped);
        }
        out
    }

    /// Replace every key `k` with `fn(k)`, leaving values untouched
    ///
    /// Nested substructure is preserved with keys transformed recursively.
    pub fn map_keys<F>(&self, f: F) -> Batch
    where
        F: Fn(&str) -> String,
    {
        self.map_keys_inner(&f)
    }

    fn map_keys_inner<F>(&self, f: &F) -> Batch
    where
        F: Fn(&str) -> String,
    {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let mapped = match value {
                Value::Batch(sub) => Value::Batch(sub.map_keys_inner(f)),
                leaf => leaf.clone(),
            };
            out.insert(f(key), mapped);
        }
        out
    }

    /// Keep only the leaves for which the predicate holds
    ///
    /// Nested batches are filtered recursively and always kept as containers,
    /// even when all their children are removed.
    pub fn filter<F>(&self, f: F) -> Batch
    where
        F: Fn(&Value) -> bool,
    {
        self.filter_inner(&f)
    }

    fn filter_inner<F>(&self, f: &F) -> Batch
    where
        F: Fn(&Value) -> bool,
    {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            match value {
                Value::Batch(sub) => {
                    out.insert(key.clone(), Value::Batch(sub.filter_inner(f)));
                }
                leaf => {
                    if f(leaf) {
                        out.insert(key.clone(), leaf.clone());
                    }
                }
            }
        }
        out
    }

    /// Flatten the tree into a single-level batch
    ///
    /// Nested keys are joined with `separator` between parent and child, so
    /// `{"a": {"b": 1}}` flattens to `{"a.b": 1}` with the default separator.
    pub fn flatten(&self, separator: &str) -> Batch {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            match value {
                Value::Batch(sub) => {
                    let prefixed = sub.flatten(separator).add_prefix(&format!("{key}{separator}"));
                    out.update(prefixed);
                }
                leaf => {
                    out.insert(key.clone(), leaf.clone());
                }
            }
        }
        out
    }

    /// Rewrite every top-level key to `prefix + key` (non-recursive)
    pub fn add_prefix(&self, prefix: &str) -> Batch {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            out.insert(format!("{prefix}{key}"), value.clone());
        }
        out
    }

    /// Rewrite every top-level key to `key + postfix` (non-recursive)
    pub fn add_postfix(&self, postfix: &str) -> Batch {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            out.insert(format!("{key}{postfix}"), value.clone());
        }
        out
    }

    /// Rekey entries through an old-key to new-key mapping
    ///
    /// For each `(old, new)` pair, the new key takes the old key's value when
    /// the old key is contained, and [`Value::Null`] otherwise. Containment
    /// follows [`Batch::contains`], so an empty value also remaps to null.
    pub fn remap<'a, I>(&self, mapping: I) -> Batch
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut out = Batch::new();
        for (old_key, new_key) in mapping {
            let value = if self.contains(old_key) {
                self.get_key(old_key).unwrap_or(Value::Null)
            } else {
                Value::Null
            };
            out.insert(new_key.to_string(), value);
        }
        out
    }

    /// Swap keys and values
    ///
    /// Every value must be a string, and no two values may collide as keys;
    /// either violation is an [`Error::Invariant`].
    pub fn transpose(&self) -> Result<Batch> {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let Value::Str(new_key) = value else {
                return Err(Error::Invariant {
                    msg: format!(
                        "only string-valued batches can be transposed, '{key}' is a {}",
                        value.type_name()
                    ),
                });
            };
            if out.entries.contains_key(new_key) {
                return Err(Error::Invariant {
                    msg: format!("cannot transpose batch with duplicate value '{new_key}'"),
                });
            }
            out.insert(new_key.clone(), Value::Str(key.clone()));
        }
        Ok(out)
    }

    /// Convert back to a plain ordered mapping
    ///
    /// Nested batches stay `Value::Batch` in the returned map; the `Value`
    /// model has no raw-mapping representation to convert them to. Serialize
    /// the batch for a fully plain rendition (e.g. JSON).
    pub fn to_dict(&self) -> IndexMap<String, Value> {
        self.entries.clone()
    }

    /// Collect consecutive integer indexings into a list of batches
    ///
    /// Produces `self[0], self[1], ...` until an out-of-bounds or key-not-found
    /// error occurs (terminating silently) or an indexed element comes back
    /// empty. Any other indexing failure propagates.
    pub fn to_list(&self) -> Result<Vec<Batch>> {
        let mut elements = Vec::new();
        for i in 0.. {
            let element = match self.get(Index::At(i)) {
                Ok(Value::Batch(b)) => b,
                Ok(_) => unreachable!("integer indexing always yields a batch"),
                Err(Error::IndexOutOfBounds { .. }) | Err(Error::KeyNotFound { .. }) => break,
                Err(other) => return Err(other),
            };
            if element.is_empty() {
                break;
            }
            elements.push(element);
        }
        Ok(elements)
    }

    /// Select keys at any depth matching glob-style patterns
    ///
    /// Patterns match against the fully flattened (dot-joined) key set; the
    /// result is a batch restricted to the keys matched by any pattern, with
    /// matched nested keys landing as flat dotted keys. Keys appear in
    /// pattern order, then in key order within a pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let inner = Batch::from_pairs([("weight", 1), ("bias", 2)]);
    /// let batch = Batch::from_pairs([("layer", Value::Batch(inner)), ("lr", Value::Float(0.1))]);
    /// let weights = batch.query_wildcard(&["*.weight"])?;
    /// assert_eq!(weights.get("layer.weight")?, Value::Int(1));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn query_wildcard(&self, patterns: &[&str]) -> Result<Batch> {
        let keys = self.keys_deep(-1);
        let mut matched: Vec<String> = Vec::new();
        for pattern in patterns {
            let compiled = Pattern::new(pattern).map_err(|e| Error::Invariant {
                msg: format!("invalid wildcard pattern '{pattern}': {e}"),
            })?;
            for key in &keys {
                if compiled.matches(key) && !matched.contains(key) {
                    matched.push(key.clone());
                }
            }
        }
        match self.get(Index::Keys(matched))? {
            Value::Batch(b) => Ok(b),
            _ => unreachable!("key-list indexing always yields a batch"),
        }
    }
}
