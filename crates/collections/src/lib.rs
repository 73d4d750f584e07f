//! Pointer-stable id-indexed collections shared by the graph, scheduler and
//! buffer pool crates.
//!
//! [`Map`] is the id-indexed slot map with an in-band free list; [`Array`]
//! is a thin geometric-growth vector used where a plain index is enough.

#![forbid(unsafe_code)]

mod map;
pub use self::map::{Map, INVALID_ID};

mod array;
pub use self::array::Array;
