//! In-memory shape of an assembled evidence report

use serde::Serialize;

use crate::capture::{Image, PixelFormat};
use crate::evidence::{EntryId, SessionInfo, Step};

/// Default report heading
pub const DEFAULT_TITLE: &str = "Test Evidence Report";

/// An assembled report: a header and one section per evidence entry, in
/// report order. Built on demand and never kept by the log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportDocument {
    pub header: ReportHeader,
    pub sections: Vec<ReportSection>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportHeader {
    pub title: String,
    /// ISO-8601
    pub generated_at: String,
    pub session: Option<SessionInfo>,
    pub steps: Vec<Step>,
}

/// One evidence entry as it appears in the report.
///
/// Field order is the order a writer lays them out: sequence number,
/// timestamp, description, then the image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportSection {
    /// 0-based position in the report
    pub index: usize,
    /// Capture time, ISO-8601
    pub timestamp: String,
    pub description: String,
    pub image: ReportImage,
    /// Log entry this section was built from
    pub entry: EntryId,
}

/// Composited image embedded in a section
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl From<Image> for ReportImage {
    fn from(image: Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: image.format(),
            bytes: image.bytes().to_vec(),
        }
    }
}

impl ReportImage {
    pub fn to_image(&self) -> Image {
        Image::new(self.width, self.height, self.format, self.bytes.clone())
    }
}

impl ReportDocument {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
