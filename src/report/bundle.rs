//! Writing an assembled report to disk as a folder of PNGs plus a manifest
//!
//! Layout of a bundle:
//!
//! ```text
//! <dest>/report.json      header and sections, in report order
//! <dest>/images/000.png   composited image of section 0
//! <dest>/images/001.png   ...
//! ```
//!
//! The bundle is built in a temporary directory next to `dest` and renamed
//! into place at the end, so a failure never leaves a partial report behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;

use super::document::{ReportDocument, ReportHeader};
use crate::config::EngineConfig;
use crate::error::ExportError;
use crate::evidence::EntryId;

pub const MANIFEST_FILE: &str = "report.json";
pub const IMAGES_DIR: &str = "images";

/// How images are embedded in a bundle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BundleOptions {
    /// Downscale wider images to this width, keeping the aspect ratio
    pub max_width: Option<u32>,
}

impl From<&EngineConfig> for BundleOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_width: config.embed_max_width_px,
        }
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    header: &'a ReportHeader,
    sections: Vec<ManifestSection<'a>>,
}

#[derive(Serialize)]
struct ManifestSection<'a> {
    index: usize,
    timestamp: &'a str,
    description: &'a str,
    image_file: String,
    width: u32,
    height: u32,
    entry: EntryId,
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    // Writes IEND; dropping the writer instead would swallow the error
    writer.finish()
}

fn fit_width(image: RgbaImage, max_width: Option<u32>) -> RgbaImage {
    let Some(max_width) = max_width.filter(|w| *w > 0) else {
        return image;
    };
    if image.width() <= max_width {
        return image;
    }
    let height = ((image.height() as u64 * max_width as u64) / image.width() as u64).max(1) as u32;
    image::imageops::resize(
        &image,
        max_width,
        height,
        image::imageops::FilterType::Lanczos3,
    )
}

/// Write `document` as a report bundle at `dest`, which must not exist yet.
pub fn write_bundle(
    document: &ReportDocument,
    dest: &Path,
    options: &BundleOptions,
) -> Result<PathBuf, ExportError> {
    if dest.exists() {
        return Err(ExportError::AlreadyExists(dest.to_path_buf()));
    }
    let parent = match dest.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(ExportError::NoParent(dest.to_path_buf())),
    };
    std::fs::create_dir_all(parent)?;

    // Removed again on drop if anything below fails
    let staging = tempfile::Builder::new()
        .prefix(".report-")
        .tempdir_in(parent)?;
    let images_dir = staging.path().join(IMAGES_DIR);
    std::fs::create_dir(&images_dir)?;

    let mut sections = Vec::with_capacity(document.sections.len());
    for section in &document.sections {
        let rgba = fit_width(section.image.to_image().to_rgba()?, options.max_width);
        let image_file = format!("{}/{:03}.png", IMAGES_DIR, section.index);
        let file = std::fs::File::create(staging.path().join(&image_file))?;
        let mut out = io::BufWriter::new(file);
        write_png(&mut out, &rgba)?;
        out.flush()?;

        sections.push(ManifestSection {
            index: section.index,
            timestamp: &section.timestamp,
            description: &section.description,
            image_file,
            width: rgba.width(),
            height: rgba.height(),
            entry: section.entry,
        });
    }

    let manifest = Manifest {
        header: &document.header,
        sections,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(staging.path().join(MANIFEST_FILE), json)?;

    std::fs::rename(staging.path(), dest)?;
    log::info!(
        "Report bundle with {} sections written to {}",
        document.sections.len(),
        dest.display()
    );
    Ok(dest.to_path_buf())
}
