//! Annotate screenshots and assemble them into test evidence reports.
//!
//! A captured [`Image`] enters an [`EvidenceLog`] as an entry with its own
//! [`LayerStack`] of annotations. Edits are reversible [`Command`]s; the base
//! image is never modified. [`assemble`] flattens every entry into a
//! [`ReportDocument`], which [`write_bundle`] can persist to disk.
//!
//! ```no_run
//! use snapevidence::{Annotation, Color, Command, EvidenceLog, Image, assemble};
//!
//! let mut log = EvidenceLog::new();
//! let id = log.append_entry(Image::filled(800, 600, [255, 255, 255, 255]), "Login page");
//! log.apply(
//!     id,
//!     Command::Add(Annotation::redaction((10.0, 10.0), (200.0, 40.0), Color::BLACK)),
//! )?;
//! let report = assemble(&log)?;
//! assert_eq!(report.sections.len(), 1);
//! # Ok::<(), snapevidence::Error>(())
//! ```

pub mod annotations;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod evidence;
pub mod render;
pub mod report;
pub mod session;

pub use annotations::{DrawAction, Drawing, Tool, ToolDefaults};
pub use capture::{Image, PixelFormat};
pub use config::EngineConfig;
pub use domain::{Annotation, Color, Font, Point, Rect, StrokeStyle};
pub use error::{AssemblyError, EditError, Error, ExportError, LogError, RenderError, Result};
pub use evidence::{EntryId, EvidenceEntry, EvidenceLog, SessionInfo, Step};
pub use render::{composite, composite_region};
pub use report::{
    AssembleOptions, BundleOptions, ReportDocument, assemble, assemble_with, write_bundle,
};
pub use session::{Command, History, LayerStack};
