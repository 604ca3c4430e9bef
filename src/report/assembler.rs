//! Turning an evidence log into a report document

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use rayon::prelude::*;

use super::document::{DEFAULT_TITLE, ReportDocument, ReportHeader, ReportSection};
use crate::config::EngineConfig;
use crate::error::AssemblyError;
use crate::evidence::{EvidenceLog, LogSnapshot};

/// Report-level settings for assembly
#[derive(Clone, Debug, PartialEq)]
pub struct AssembleOptions {
    pub title: String,
    /// Generation time stamped in the header; `None` means now
    pub generated_at: Option<DateTime<FixedOffset>>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at: None,
        }
    }
}

impl From<&EngineConfig> for AssembleOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            title: config.report_title.clone(),
            generated_at: None,
        }
    }
}

fn iso8601(at: DateTime<FixedOffset>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Assemble a report from the log's current state with default options
pub fn assemble(log: &EvidenceLog) -> Result<ReportDocument, AssemblyError> {
    assemble_with(log, &AssembleOptions::default())
}

/// Assemble a report from a snapshot of the log.
///
/// The log is only read, once, to take the snapshot; edits made while the
/// images are being composited do not show up in this report.
pub fn assemble_with(
    log: &EvidenceLog,
    options: &AssembleOptions,
) -> Result<ReportDocument, AssemblyError> {
    assemble_snapshot(&log.snapshot(), options)
}

/// Composite every entry of `snapshot` and lay out one section per entry.
///
/// If any entry cannot be composited the whole assembly fails with the
/// earliest such entry in report order; no partial report is returned.
pub fn assemble_snapshot(
    snapshot: &LogSnapshot,
    options: &AssembleOptions,
) -> Result<ReportDocument, AssemblyError> {
    log::info!(
        "Assembling report \"{}\" from {} entries",
        options.title,
        snapshot.entries.len()
    );

    // Entries are independent; collect keeps report order
    let rendered: Vec<_> = snapshot
        .entries
        .par_iter()
        .map(|entry| entry.composite())
        .collect();

    let mut sections = Vec::with_capacity(rendered.len());
    for (index, (entry, result)) in snapshot.entries.iter().zip(rendered).enumerate() {
        let image = result.map_err(|cause| {
            log::error!("Report assembly aborted at entry {}: {}", entry.id, cause);
            AssemblyError::AssemblyFailed {
                entry: entry.id,
                cause,
            }
        })?;
        sections.push(ReportSection {
            index,
            timestamp: iso8601(entry.captured_at),
            description: entry.description.clone(),
            image: image.into(),
            entry: entry.id,
        });
    }

    let generated_at = options
        .generated_at
        .unwrap_or_else(|| Local::now().fixed_offset());
    let header = ReportHeader {
        title: options.title.clone(),
        generated_at: iso8601(generated_at),
        session: snapshot.session.clone(),
        steps: snapshot.steps.clone(),
    };

    log::info!("Report assembled with {} sections", sections.len());
    Ok(ReportDocument { header, sections })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Image, PixelFormat};
    use crate::domain::{Annotation, Color, StrokeStyle};
    use crate::error::RenderError;
    use crate::evidence::SessionInfo;
    use crate::render;
    use crate::session::Command;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 9, minute, 0)
            .unwrap()
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_sections_follow_log_order() {
        init_logger();
        let mut log = EvidenceLog::new();
        let e1 = log.append_entry_at(Image::filled(8, 8, [255, 0, 0, 255]), "E1", at(0));
        let e2 = log.append_entry_at(Image::filled(4, 6, [0, 255, 0, 255]), "E2", at(5));

        let doc = assemble(&log).unwrap();
        assert_eq!(doc.len(), 2);

        let s0 = &doc.sections[0];
        assert_eq!((s0.index, s0.entry), (0, e1));
        assert_eq!(s0.description, "E1");
        assert_eq!(s0.timestamp, "2024-05-01T09:00:00+02:00");
        assert_eq!((s0.image.width, s0.image.height), (8, 8));

        let s1 = &doc.sections[1];
        assert_eq!((s1.index, s1.entry), (1, e2));
        assert_eq!(s1.description, "E2");
        assert_eq!(s1.image.format, PixelFormat::Rgba8);
        assert_eq!(&s1.image.bytes[..4], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_reordered_log_reorders_sections() {
        let mut log = EvidenceLog::new();
        let a = log.append_entry_at(Image::filled(2, 2, [0, 0, 0, 255]), "A", at(0));
        let b = log.append_entry_at(Image::filled(2, 2, [0, 0, 0, 255]), "B", at(1));
        log.reorder(&[b, a]).unwrap();

        let doc = assemble(&log).unwrap();
        let order: Vec<_> = doc.sections.iter().map(|s| (s.index, s.entry)).collect();
        assert_eq!(order, vec![(0, b), (1, a)]);
    }

    #[test]
    fn test_embedded_image_is_the_composite() {
        let mut log = EvidenceLog::new();
        let id = log.append_entry_at(Image::filled(60, 60, [90, 90, 90, 255]), "x", at(0));
        log.apply(
            id,
            Command::Add(Annotation::rectangle(
                (10.0, 10.0),
                (50.0, 50.0),
                StrokeStyle::default(),
            )),
        )
        .unwrap();
        log.apply(
            id,
            Command::Add(Annotation::redaction((0.0, 0.0), (20.0, 20.0), Color::BLACK)),
        )
        .unwrap();

        let doc = assemble(&log).unwrap();
        let entry = log.entry(id).unwrap();
        let expected = render::composite(entry.image(), &entry.annotations()).unwrap();
        assert_eq!(doc.sections[0].image.bytes, expected.bytes());
    }

    #[test]
    fn test_corrupt_entry_aborts_assembly() {
        init_logger();
        let mut log = EvidenceLog::new();
        log.append_entry_at(Image::filled(4, 4, [1, 2, 3, 255]), "fine", at(0));
        let bad = log.append_entry_at(Image::new(4, 4, PixelFormat::Rgba8, vec![0; 7]), "bad", at(1));
        let worse = log.append_entry_at(Image::new(0, 0, PixelFormat::Rgb8, Vec::new()), "worse", at(2));

        let err = assemble(&log).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::AssemblyFailed {
                entry: bad,
                cause: RenderError::BufferSizeMismatch {
                    expected: 64,
                    actual: 7
                },
            }
        );

        // Moving the other broken entry first changes which one is reported
        let ids = log.ids().to_vec();
        log.reorder(&[worse, ids[0], bad]).unwrap();
        assert!(matches!(
            assemble(&log),
            Err(AssemblyError::AssemblyFailed { entry, .. }) if entry == worse
        ));
    }

    #[test]
    fn test_assembly_does_not_mutate_log() {
        let mut log = EvidenceLog::new();
        let id = log.append_entry_at(Image::filled(5, 5, [9, 9, 9, 255]), "d", at(0));
        log.apply(
            id,
            Command::Add(Annotation::redaction((0.0, 0.0), (3.0, 3.0), Color::BLACK)),
        )
        .unwrap();
        let before = log.entry(id).unwrap().annotations();

        assemble(&log).unwrap();

        let entry = log.entry(id).unwrap();
        assert_eq!(entry.annotations(), before);
        assert!(entry.is_dirty());
        assert_eq!(entry.image().pixel(0, 0), Some([9, 9, 9, 255]));
    }

    #[test]
    fn test_header_carries_session_and_steps() {
        let mut log = EvidenceLog::new();
        log.set_session(SessionInfo {
            test_case_id: "LOGIN-7".to_string(),
            title: "Login rejects empty password".to_string(),
            tester: "qa".to_string(),
            ..Default::default()
        });
        log.record_step_at("Open the login page", at(0));
        let options = AssembleOptions {
            title: "Sprint 12 evidence".to_string(),
            generated_at: Some(at(30)),
        };

        let doc = assemble_with(&log, &options).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.header.title, "Sprint 12 evidence");
        assert_eq!(doc.header.generated_at, "2024-05-01T09:30:00+02:00");
        assert_eq!(doc.header.session.as_ref().unwrap().test_case_id, "LOGIN-7");
        assert_eq!(doc.header.steps.len(), 1);
        assert_eq!(doc.header.steps[0].number, 1);
    }
}
