//! Reversible edit commands and the undo/redo stacks
//!
//! A [`Command`] is what a caller asks for. Once applied it becomes an
//! [`Edit`], which also records everything needed to take it back, captured
//! at apply time rather than reconstructed later.

use crate::domain::Annotation;
use crate::error::EditError;

/// An edit request against a layer stack
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Put an annotation on top of the stack
    Add(Annotation),
    /// Take out the annotation at a position
    Remove(usize),
    /// Replace the annotation at a position
    Modify(usize, Annotation),
    /// Remove every annotation
    Clear,
}

/// An applied command together with its inverse state
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    Added(Annotation),
    Removed {
        position: usize,
        annotation: Annotation,
    },
    Modified {
        position: usize,
        before: Annotation,
        after: Annotation,
    },
    Cleared(Vec<Annotation>),
}

fn check_position(position: usize, layers: &[Annotation]) -> Result<(), EditError> {
    if position < layers.len() {
        Ok(())
    } else {
        Err(EditError::InvalidPosition {
            position,
            len: layers.len(),
        })
    }
}

impl Edit {
    /// Run `command` against `layers`. On error `layers` is untouched.
    pub(crate) fn execute(command: Command, layers: &mut Vec<Annotation>) -> Result<Edit, EditError> {
        let edit = match command {
            Command::Add(annotation) => {
                layers.push(annotation.clone());
                Edit::Added(annotation)
            }
            Command::Remove(position) => {
                check_position(position, layers)?;
                let annotation = layers.remove(position);
                Edit::Removed {
                    position,
                    annotation,
                }
            }
            Command::Modify(position, after) => {
                check_position(position, layers)?;
                let before = std::mem::replace(&mut layers[position], after.clone());
                Edit::Modified {
                    position,
                    before,
                    after,
                }
            }
            Command::Clear => Edit::Cleared(std::mem::take(layers)),
        };
        Ok(edit)
    }

    /// Undo this edit. `layers` must be in the state right after it applied.
    pub(crate) fn revert(&self, layers: &mut Vec<Annotation>) {
        match self {
            Edit::Added(_) => {
                layers.pop();
            }
            Edit::Removed {
                position,
                annotation,
            } => layers.insert(*position, annotation.clone()),
            Edit::Modified {
                position, before, ..
            } => layers[*position] = before.clone(),
            Edit::Cleared(previous) => *layers = previous.clone(),
        }
    }

    /// Redo this edit. `layers` must be in the state right before it applied.
    pub(crate) fn reapply(&self, layers: &mut Vec<Annotation>) {
        match self {
            Edit::Added(annotation) => layers.push(annotation.clone()),
            Edit::Removed { position, .. } => {
                layers.remove(*position);
            }
            Edit::Modified {
                position, after, ..
            } => layers[*position] = after.clone(),
            Edit::Cleared(_) => layers.clear(),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Edit::Added(_) => "add",
            Edit::Removed { .. } => "remove",
            Edit::Modified { .. } => "modify",
            Edit::Cleared(_) => "clear",
        }
    }

    /// The command that produced this edit
    pub fn command(&self) -> Command {
        match self {
            Edit::Added(annotation) => Command::Add(annotation.clone()),
            Edit::Removed { position, .. } => Command::Remove(*position),
            Edit::Modified {
                position, after, ..
            } => Command::Modify(*position, after.clone()),
            Edit::Cleared(_) => Command::Clear,
        }
    }
}

/// Undo and redo stacks for one layer stack
#[derive(Clone, Debug)]
pub struct History {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
    /// Undo depth at the last save checkpoint; `None` once that state can
    /// no longer be reached by undo/redo
    saved_depth: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            saved_depth: Some(0),
        }
    }
}

impl History {
    /// Record a freshly applied edit, discarding any redo branch
    pub(crate) fn push(&mut self, edit: Edit) {
        if self.saved_depth.is_some_and(|d| d > self.undo_stack.len()) {
            self.saved_depth = None;
        }
        self.redo_stack.clear();
        self.undo_stack.push(edit);
    }

    /// Revert the newest edit against `layers`
    pub(crate) fn undo(&mut self, layers: &mut Vec<Annotation>) -> Result<(), EditError> {
        let edit = self.undo_stack.pop().ok_or(EditError::NothingToUndo)?;
        edit.revert(layers);
        log::debug!("Undid {} edit, {} left", edit.name(), self.undo_stack.len());
        self.redo_stack.push(edit);
        Ok(())
    }

    /// Re-apply the most recently undone edit against `layers`
    pub(crate) fn redo(&mut self, layers: &mut Vec<Annotation>) -> Result<(), EditError> {
        let edit = self.redo_stack.pop().ok_or(EditError::NothingToRedo)?;
        edit.reapply(layers);
        log::debug!("Redid {} edit, {} left", edit.name(), self.redo_stack.len());
        self.undo_stack.push(edit);
        Ok(())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Edits that built the current state, oldest first
    pub fn applied(&self) -> &[Edit] {
        &self.undo_stack
    }

    /// Rebuild the layer sequence from empty by replaying the undo stack
    pub fn replay(&self) -> Vec<Annotation> {
        let mut layers = Vec::new();
        for edit in &self.undo_stack {
            edit.reapply(&mut layers);
        }
        layers
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved_depth = Some(self.undo_stack.len());
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.saved_depth != Some(self.undo_stack.len())
    }
}
