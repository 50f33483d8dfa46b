//! Leaf value model
//!
//! This module provides the `Value` enum, the closed model of everything a
//! [`Batch`] can hold: scalars, strings, lists, and nested batches. Nested
//! plain mappings do not exist in this model; every mapping-shaped value is a
//! `Value::Batch`, so the tree never contains raw mappings by construction.

mod ops;
mod serde;

pub use ops::{apply_binary, apply_unary, BinaryOp, UnaryOp};

use crate::batch::{Batch, Coord};
use crate::error::{Error, Result};
use std::fmt;

/// A value stored in a [`Batch`]
///
/// Either a leaf (scalar, string, or list) or another `Batch`, forming a tree
/// of arbitrary depth.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// The empty/null marker (used e.g. by [`Batch::remap`] for missing keys)
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// String
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Nested batch
    Batch(Batch),
}

impl Value {
    /// Runtime type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Batch(_) => "batch",
        }
    }

    /// Length of the value, if it has one
    ///
    /// Strings report their character count, lists their element count and
    /// batches their key count. Scalars have no length.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Batch(b) => Some(b.len()),
            _ => None,
        }
    }

    /// Whether the value reads as empty
    ///
    /// `Null` and zero-length strings/lists/batches are empty; scalars never
    /// are. This is the emptiness notion the containment check builds on.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            _ => self.len() == Some(0),
        }
    }

    /// Truthiness: non-zero scalars and non-empty containers are truthy
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            _ => !self.is_empty(),
        }
    }

    /// Index into a contained batch
    ///
    /// Convenience for traversing results of batch operations; errors with
    /// [`Error::UnsupportedIndex`] if the value is not a batch.
    pub fn get<I: Into<crate::batch::Index>>(&self, index: I) -> Result<Value> {
        match self {
            Value::Batch(b) => b.get(index),
            other => Err(Error::UnsupportedIndex {
                found: format!("batch index into a {}", other.type_name()),
            }),
        }
    }

    /// Element-wise index with a single integer
    ///
    /// Negative indices count from the end. Lists yield the element, strings
    /// the character, nested batches broadcast the index across their members.
    pub fn index_at(&self, index: isize) -> Result<Value> {
        self.index_coords(&[Coord::At(index)])
    }

    /// Element-wise index with a coordinate list (the multi-dimensional case)
    ///
    /// Coordinates apply left to right: an integer descends one level, a range
    /// slices the current level and applies the remaining coordinates to every
    /// sliced element (so `[Coord::full(), Coord::At(2)]` selects "column 2"
    /// of a list of lists).
    pub fn index_coords(&self, coords: &[Coord]) -> Result<Value> {
        let Some((head, rest)) = coords.split_first() else {
            return Ok(self.clone());
        };
        match self {
            Value::List(items) => match head {
                Coord::At(i) => {
                    let at = resolve_index(*i, items.len())?;
                    items[at].index_coords(rest)
                }
                Coord::Range { start, end } => {
                    let (lo, hi) = resolve_range(*start, *end, items.len());
                    items[lo..hi]
                        .iter()
                        .map(|item| item.index_coords(rest))
                        .collect::<Result<Vec<_>>>()
                        .map(Value::List)
                }
            },
            Value::Str(s) => match head {
                Coord::At(i) if rest.is_empty() => {
                    let chars: Vec<char> = s.chars().collect();
                    let at = resolve_index(*i, chars.len())?;
                    Ok(Value::Str(chars[at].to_string()))
                }
                Coord::Range { start, end } if rest.is_empty() => {
                    let chars: Vec<char> = s.chars().collect();
                    let (lo, hi) = resolve_range(*start, *end, chars.len());
                    Ok(Value::Str(chars[lo..hi].iter().collect()))
                }
                _ => Err(Error::UnsupportedIndex {
                    found: "multi-dimensional index into a string".to_string(),
                }),
            },
            Value::Batch(b) => Ok(Value::Batch(b.index_members(coords)?)),
            other => Err(Error::UnsupportedIndex {
                found: format!("integer index into a {}", other.type_name()),
            }),
        }
    }
}

/// Resolve a possibly-negative index against a length
pub(crate) fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let at = if index < 0 {
        index + len as isize
    } else {
        index
    };
    if at < 0 || at as usize >= len {
        return Err(Error::IndexOutOfBounds { index, len });
    }
    Ok(at as usize)
}

/// Resolve optional range bounds against a length, clamping out-of-range
/// bounds instead of erroring
pub(crate) fn resolve_range(start: Option<isize>, end: Option<isize>, len: usize) -> (usize, usize) {
    let clamp = |bound: isize| -> usize {
        let b = if bound < 0 { bound + len as isize } else { bound };
        b.clamp(0, len as isize) as usize
    };
    let lo = start.map(clamp).unwrap_or(0);
    let hi = end.map(clamp).unwrap_or(len);
    (lo, hi.max(lo))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Batch(b) => write!(f, "{b}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Batch> for Value {
    fn from(v: Batch) -> Self {
        Value::Batch(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_at_negative() {
        let v = Value::from(vec![1, 2, 3]);
        assert_eq!(v.index_at(-1).unwrap(), Value::Int(3));
        assert_eq!(v.index_at(0).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_index_at_out_of_bounds() {
        let v = Value::from(vec![1, 2]);
        assert_eq!(
            v.index_at(5),
            Err(Error::IndexOutOfBounds { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_index_coords_column_select() {
        // [[0,1,2],[3,4,5],[6,7,8]][:, 2] == [2, 5, 8]
        let rows = Value::List(vec![
            Value::from(vec![0, 1, 2]),
            Value::from(vec![3, 4, 5]),
            Value::from(vec![6, 7, 8]),
        ]);
        let col = rows.index_coords(&[Coord::full(), Coord::At(2)]).unwrap();
        assert_eq!(col, Value::from(vec![2, 5, 8]));
    }

    #[test]
    fn test_emptiness() {
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::Int(0).is_empty());
        assert!(!Value::from("x").is_empty());
    }
}
