//! Flattening a base image and its annotation layers into one raster

use super::image::Canvas;
use crate::capture::Image;
use crate::domain::{Annotation, Rect};
use crate::error::RenderError;

/// Render `annotations` in sequence order over a copy of `image`.
///
/// The base image is never modified. Identical inputs always produce
/// byte-identical output, which is what gets embedded in reports.
pub fn composite(image: &Image, annotations: &[Annotation]) -> Result<Image, RenderError> {
    let base = image.to_rgba()?;
    let mut canvas = Canvas::from_rgba(base)?;

    for annotation in annotations {
        annotation.render(&mut canvas);
    }

    log::debug!(
        "Composited {}x{} image with {} annotations",
        image.width(),
        image.height(),
        annotations.len()
    );
    Ok(Image::from_rgba(canvas.into_rgba()))
}

/// Recompose only `region` on top of an earlier composite of the same image.
///
/// Pixels outside `region` are taken from `previous` unchanged; inside it the
/// base pixels are restored and every annotation whose bounds reach into the
/// region is drawn again, clipped. Use [`changed_region`] to find the region
/// touched by an edit.
pub fn composite_region(
    image: &Image,
    annotations: &[Annotation],
    previous: &Image,
    region: Rect,
) -> Result<Image, RenderError> {
    let base = image.to_rgba()?;
    let prev = previous.to_rgba()?;
    if prev.dimensions() != base.dimensions() {
        return Err(RenderError::SizeMismatch {
            expected: base.dimensions(),
            actual: prev.dimensions(),
        });
    }

    let area = Rect::of_size(base.width(), base.height());
    let Some(region) = region.intersect(area) else {
        return Ok(Image::from_rgba(prev));
    };

    let mut canvas = Canvas::from_rgba(prev)?;
    canvas.copy_region_from(&base, region);
    canvas.set_clip(region);

    let mut redrawn = 0usize;
    for annotation in annotations {
        if annotation.bounds().intersect(region).is_some() {
            annotation.render(&mut canvas);
            redrawn += 1;
        }
    }

    log::debug!(
        "Recomposited region {:?}, redrew {} of {} annotations",
        region,
        redrawn,
        annotations.len()
    );
    Ok(Image::from_rgba(canvas.into_rgba()))
}

/// Union of the bounds of every annotation that differs between two stacks.
///
/// Positions are compared pairwise, so a removal near the bottom of the
/// stack dirties everything above it. `None` when the stacks are equal.
pub fn changed_region(before: &[Annotation], after: &[Annotation]) -> Option<Rect> {
    let mut dirty = Rect::default();
    for i in 0..before.len().max(after.len()) {
        let (old, new) = (before.get(i), after.get(i));
        if old == new {
            continue;
        }
        for ann in [old, new].into_iter().flatten() {
            dirty = dirty.union(ann.bounds());
        }
    }
    (!dirty.is_empty()).then_some(dirty)
}
