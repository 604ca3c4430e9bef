//! Error types for editing, compositing, logging and report assembly
//!
//! Every operation either fully applies or has no effect, so none of these
//! errors leave the in-memory state inconsistent.

use std::path::PathBuf;

use thiserror::Error;

use crate::evidence::EntryId;

/// Failures of a layer stack edit.
///
/// `NothingToUndo` and `NothingToRedo` are history boundaries, not real
/// failures; callers treat them as "action disabled" signals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A position-addressed command referenced an index outside the stack.
    ///
    /// Usually the caller edited against a stale view; refresh and retry.
    #[error("position {position} is out of range for a stack of {len} annotations")]
    InvalidPosition {
        /// The requested position
        position: usize,
        /// Stack length at the time of the request
        len: usize,
    },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Failures of evidence log operations given malformed identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("unknown evidence entry {0}")]
    UnknownEntry(EntryId),

    /// A reorder request was not a full permutation of the log's ids.
    #[error("reorder expected a permutation of {expected} entries, got {given} ids")]
    PermutationMismatch {
        /// Number of entries currently in the log
        expected: usize,
        /// Number of ids supplied by the caller
        given: usize,
    },
}

/// Failures while turning a base image and its annotations into a raster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("image has zero width or height ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Byte length does not match `width * height * bytes_per_pixel`.
    #[error("image buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Valid, but wider than a drawing surface can address.
    #[error("image is too large to draw on ({width}x{height})")]
    TooLarge { width: u32, height: u32 },

    #[error("could not decode image: {0}")]
    Decode(String),

    /// A previous composite handed to incremental recomposition has the wrong size.
    #[error("previous composite is {actual:?}, expected {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Report assembly aborted; no partial report is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("assembly failed at entry {entry}: {cause}")]
    AssemblyFailed {
        /// The first entry, in report order, that could not be composited
        entry: EntryId,
        cause: RenderError,
    },
}

/// Failures while persisting an assembled report to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("report destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("report destination has no parent directory: {}", .0.display())]
    NoParent(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Umbrella error for callers that do not need to distinguish components.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
