//! # batchr
//!
//! **Nested, insertion-ordered batch container with member-wise broadcasting.**
//!
//! batchr provides [`Batch`](batch::Batch), a tree-shaped, string-keyed container that
//! mirrors operations across all its values: index one element out of every
//! member at once, add two batches member by member, or flatten a nested tree
//! into dotted keys. It is built for batched record manipulation in
//! data-processing pipelines, where a "row" is a bundle of named sequences
//! that should move together.
//!
//! ## Highlights
//!
//! - **Polymorphic indexing**: string keys, dot-paths into nested batches,
//!   integer and multi-dimensional element broadcasts, key-list selection
//! - **Recursive nesting**: batch values may be batches; transforms and
//!   broadcasts apply at every level
//! - **Explicit broadcasting**: a fixed operator table plus
//!   [`attr`](batch::Batch::attr)/[`invoke`](batch::Batch::invoke)/
//!   [`call`](batch::Batch::call) for named and functional member access,
//!   bound statically
//! - **Transforms**: map, filter, flatten, remap, transpose, wildcard queries
//! - **serde**: batches serialize as maps, values json-style
//!
//! ## Quick Start
//!
//! ```
//! use batchr::prelude::*;
//!
//! let a = Batch::from_pairs([("x", Value::from(vec![1, 2])), ("y", Value::from(vec![3, 4]))]);
//!
//! // Element broadcast: one element out of every member
//! let row = a.get(1)?;
//! assert_eq!(row.get("x")?, Value::Int(2));
//! assert_eq!(row.get("y")?, Value::Int(4));
//!
//! // Member-wise arithmetic
//! let b = Batch::from_pairs([("x", 10), ("y", 20)]);
//! let sum = b.try_add(&Batch::from_pairs([("x", 1), ("y", 2)]))?;
//! assert_eq!(sum.get("y")?, Value::Int(22));
//! # Ok::<(), batchr::error::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! `Batch` is a plain in-memory structure: no operation blocks, suspends, or
//! performs I/O. It is `Send + Sync` but not safe for concurrent mutation;
//! callers requiring shared mutation must serialize access externally.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod collate;
pub mod error;
pub mod split;
pub mod value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{Batch, Coord, Index};
    pub use crate::collate::{collate, Record};
    pub use crate::error::{Error, Result};
    pub use crate::split::{split_list, SizeEntry, SizeMap};
    pub use crate::value::{BinaryOp, UnaryOp, Value};
}
