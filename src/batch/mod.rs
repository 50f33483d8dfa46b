//! The Batch container
//!
//! This module provides the core [`Batch`] type: its construction, its
//! polymorphic indexing ([`Index`]), its bulk transforms, and its member-wise
//! broadcasting.

mod broadcast;
mod core;
mod index;
mod transform;

pub use broadcast::Operand;
pub use core::{Batch, DefaultFactory};
pub use index::{Coord, Index};
