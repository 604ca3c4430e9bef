//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared between drawing and bounds computation
//! - Canvas drawing of each annotation variant using tiny-skia
//! - Bitmap text rendering
//! - The compositor that flattens a base image and its layers

pub mod compositor;
pub mod geometry;
pub mod image;
pub mod text;

pub use compositor::{changed_region, composite, composite_region};
pub use self::image::Canvas;
