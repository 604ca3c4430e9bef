//! Ordered annotation layers over one base image, with undo/redo

use super::history::{Command, Edit, History};
use crate::domain::{Annotation, Rect};
use crate::error::EditError;

/// Annotation layers in draw order (later entries draw on top).
///
/// Positions are indices into the current sequence, never identities: after
/// a removal every position above it shifts down.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    annotations: Vec<Annotation>,
    history: History,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command, record it for undo and drop any redo history.
    ///
    /// Fails with [`EditError::InvalidPosition`] without touching the stack
    /// when a `Remove`/`Modify` position is out of range.
    pub fn apply(&mut self, command: Command) -> Result<(), EditError> {
        let edit = Edit::execute(command, &mut self.annotations)?;
        log::debug!(
            "Applied {} edit, stack now holds {} annotations",
            edit.name(),
            self.annotations.len()
        );
        self.history.push(edit);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), EditError> {
        self.history.undo(&mut self.annotations)
    }

    pub fn redo(&mut self) -> Result<(), EditError> {
        self.history.redo(&mut self.annotations)
    }

    pub fn current_annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Whether the stack differs from the last save checkpoint (or creation)
    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    /// Record the current state as saved
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_depth() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_depth() > 0
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Topmost annotation whose bounds contain the pixel, as a position
    pub fn hit_test(&self, x: i32, y: i32) -> Option<usize> {
        self.annotations
            .iter()
            .rposition(|a| a.bounds().contains_point(x, y))
    }

    /// Union of the bounds of all layers
    pub fn bounds(&self) -> Rect {
        self.annotations
            .iter()
            .fold(Rect::default(), |acc, a| acc.union(a.bounds()))
    }
}
