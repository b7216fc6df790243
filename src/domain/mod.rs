//! Pure domain types with minimal dependencies
//!
//! Types here have no rendering or I/O dependencies so both draw
//! adapters and the editor state can share them.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
