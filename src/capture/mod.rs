//! Captured image buffers
//!
//! The screen capture itself happens outside this crate; what arrives here
//! is a raw pixel buffer that becomes the immutable base of an evidence entry.

pub mod image;

pub use self::image::{Image, PixelFormat};
