//! A single captured image with its annotations and notes

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::capture::Image;
use crate::domain::Annotation;
use crate::error::{EditError, RenderError};
use crate::render;
use crate::session::{Command, LayerStack};

/// Identity of an evidence entry, unique within its log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One capture: base image, annotation layers, timestamp and description.
///
/// The layer stack sits behind a per-entry lock, so edits, undo/redo and
/// compositing of the same entry never interleave even when issued from
/// different threads.
#[derive(Debug)]
pub struct EvidenceEntry {
    id: EntryId,
    image: Arc<Image>,
    captured_at: DateTime<FixedOffset>,
    description: String,
    layers: Mutex<LayerStack>,
}

impl EvidenceEntry {
    pub(crate) fn new(
        id: EntryId,
        image: Image,
        description: String,
        captured_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            image: Arc::new(image),
            captured_at,
            description,
            layers: Mutex::new(LayerStack::new()),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The unannotated capture
    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn captured_at(&self) -> DateTime<FixedOffset> {
        self.captured_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Every operation leaves the stack consistent, so a poisoned lock is
    /// still safe to use.
    fn layers(&self) -> MutexGuard<'_, LayerStack> {
        self.layers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply(&self, command: Command) -> Result<(), EditError> {
        self.layers().apply(command)
    }

    pub fn undo(&self) -> Result<(), EditError> {
        self.layers().undo()
    }

    pub fn redo(&self) -> Result<(), EditError> {
        self.layers().redo()
    }

    /// Copy of the current annotation sequence
    pub fn annotations(&self) -> Vec<Annotation> {
        self.layers().current_annotations().to_vec()
    }

    pub fn is_dirty(&self) -> bool {
        self.layers().is_dirty()
    }

    pub fn mark_saved(&self) {
        self.layers().mark_saved();
    }

    /// Run `f` with exclusive access to the layer stack
    pub fn with_layers<R>(&self, f: impl FnOnce(&mut LayerStack) -> R) -> R {
        f(&mut self.layers())
    }

    /// Render the current annotations over the base image
    pub fn composite(&self) -> Result<Image, RenderError> {
        let layers = self.layers();
        render::composite(&self.image, layers.current_annotations())
    }

    /// Consistent copy of everything report assembly needs
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id,
            image: Arc::clone(&self.image),
            captured_at: self.captured_at,
            description: self.description.clone(),
            annotations: self.annotations(),
        }
    }
}

/// Frozen view of an entry; later edits to the entry do not affect it
#[derive(Clone, Debug)]
pub struct EntrySnapshot {
    pub id: EntryId,
    pub image: Arc<Image>,
    pub captured_at: DateTime<FixedOffset>,
    pub description: String,
    pub annotations: Vec<Annotation>,
}

impl EntrySnapshot {
    pub fn composite(&self) -> Result<Image, RenderError> {
        render::composite(&self.image, &self.annotations)
    }
}
