//! Splitting contract for [`Batch::from_tensor`]
//!
//! [`Batch::from_tensor`] consumes a sliceable value through an injected
//! split function, a narrow and replaceable dependency: any function with the
//! [`SplitFn`] signature works. [`split_list`] is the provided implementation
//! for list values.
//!
//! [`Batch::from_tensor`]: crate::batch::Batch::from_tensor

use crate::error::{Error, Result};
use crate::value::Value;

/// Split a sliceable value along a dimension
///
/// Given a value, a size and a dimension index, returns the first `size`
/// elements and the remainder as `(head, tail)`.
pub type SplitFn = fn(&Value, usize, usize) -> Result<(Value, Value)>;

/// Split a list value along dimension 0
///
/// Returns the first `size` elements and the remainder; a size past the end
/// clamps, so the head may be shorter than requested and the tail empty.
/// Only `dim == 0` is supported.
pub fn split_list(data: &Value, size: usize, dim: usize) -> Result<(Value, Value)> {
    if dim != 0 {
        return Err(Error::Invariant {
            msg: format!("only dim 0 split is supported, got dim {dim}"),
        });
    }
    match data {
        Value::List(items) => {
            let at = size.min(items.len());
            let head = items[..at].to_vec();
            let tail = items[at..].to_vec();
            Ok((Value::List(head), Value::List(tail)))
        }
        other => Err(Error::UnsupportedIndex {
            found: format!("split of a {}", other.type_name()),
        }),
    }
}

/// One entry of a [`SizeMap`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeEntry {
    /// Consume this many elements along the split dimension
    Width(usize),
    /// Consume the nested map's total width and mirror its structure
    Nested(SizeMap),
}

/// Ordered size specification for [`Batch::from_tensor`]
///
/// An explicit ordered list of `(key, size)` entries: entry order determines
/// which slice each key receives, so the order must match the data layout.
///
/// [`Batch::from_tensor`]: crate::batch::Batch::from_tensor
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SizeMap {
    entries: Vec<(String, SizeEntry)>,
}

impl SizeMap {
    /// Create an empty size map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a width entry
    pub fn width(mut self, key: impl Into<String>, width: usize) -> Self {
        self.entries.push((key.into(), SizeEntry::Width(width)));
        self
    }

    /// Append a nested size map entry
    pub fn nested(mut self, key: impl Into<String>, sub: SizeMap) -> Self {
        self.entries.push((key.into(), SizeEntry::Nested(sub)));
        self
    }

    /// Iterate over entries in order
    pub fn iter(&self) -> impl Iterator<Item = &(String, SizeEntry)> {
        self.entries.iter()
    }

    /// Total number of elements the map consumes, nested entries included
    pub fn total_width(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, entry)| match entry {
                SizeEntry::Width(w) => *w,
                SizeEntry::Nested(sub) => sub.total_width(),
            })
            .sum()
    }
}
