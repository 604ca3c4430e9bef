//! Pure domain types with minimal dependencies
//!
//! Geometry, style and annotation value types shared by the layer stack,
//! the compositor and the report assembler.

pub mod annotation;
pub mod geometry;
pub mod style;

pub use annotation::*;
pub use geometry::*;
pub use style::*;
