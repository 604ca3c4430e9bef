//! Annotation tools
//!
//! Turns pointer gestures and tool settings into annotations ready to be
//! applied to a layer stack.

pub mod tools;

pub use tools::{DrawAction, Drawing, Tool, ToolDefaults};
