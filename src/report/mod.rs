//! Report assembly and export
//!
//! - `document`: the assembled report as plain data
//! - `assembler`: snapshotting the log and compositing every entry
//! - `bundle`: writing a report to disk as PNGs plus a JSON manifest

pub mod assembler;
pub mod bundle;
pub mod document;

pub use assembler::{AssembleOptions, assemble, assemble_snapshot, assemble_with};
pub use bundle::{BundleOptions, write_bundle};
pub use document::{DEFAULT_TITLE, ReportDocument, ReportHeader, ReportImage, ReportSection};
