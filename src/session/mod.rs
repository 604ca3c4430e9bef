//! Editing session state for one captured image
//!
//! - `history`: reversible commands and the undo/redo stacks
//! - `layer_stack`: the annotation sequence the commands mutate

pub mod history;
pub mod layer_stack;

pub use history::{Command, Edit, History};
pub use layer_stack::LayerStack;
