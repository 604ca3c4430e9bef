//! Drawing annotations onto a canvas using tiny-skia
//!
//! Every draw function is a pure function of the canvas so far and the
//! annotation's own geometry and style.

use image::RgbaImage;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap,
    PremultipliedColorU8, Stroke, Transform,
};

use super::geometry::{arrow, shadow};
use super::text;
use crate::domain::{
    Annotation, ArrowAnnotation, Color, FreehandAnnotation, HighlightAnnotation, Rect,
    RectangleAnnotation, RedactionAnnotation, StrokeStyle, normalize_rect,
};
use crate::error::RenderError;

/// Widest canvas tiny-skia can address (row stride must fit an `i32`)
pub(crate) const MAX_WIDTH: u32 = i32::MAX as u32 / 4;

/// Check that a `width` x `height` image can back a canvas
pub(crate) fn ensure_drawable(width: u32, height: u32) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    if width > MAX_WIDTH {
        return Err(RenderError::TooLarge { width, height });
    }
    Ok(())
}

/// Premultiplied RGBA drawing surface, optionally clipped to a region.
///
/// The straight-alpha source pixels are kept next to the pixmap so that
/// pixels no annotation touched come back out byte for byte.
pub struct Canvas {
    pixmap: Pixmap,
    source: RgbaImage,
    clip: Option<Mask>,
}

impl Canvas {
    /// Take an RGBA image as the starting content of a new canvas
    pub fn from_rgba(img: RgbaImage) -> Result<Self, RenderError> {
        let (width, height) = img.dimensions();
        ensure_drawable(width, height)?;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::TooLarge { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
            *dst = premultiply(src.0);
        }
        Ok(Self {
            pixmap,
            source: img,
            clip: None,
        })
    }

    /// Convert back to a straight-alpha RGBA image
    pub fn into_rgba(self) -> RgbaImage {
        let mut out = self.source;
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            // Untouched; demultiplying would round away translucent colors
            if premultiply(dst.0) == *src {
                continue;
            }
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Whole canvas as a pixel rectangle
    pub fn area(&self) -> Rect {
        Rect::of_size(self.width(), self.height())
    }

    /// Overwrite the pixels of `region` with the same pixels of `src`
    pub(crate) fn copy_region_from(&mut self, src: &RgbaImage, region: Rect) {
        let Some(area) = region.intersect(self.area()) else {
            return;
        };
        let width = self.width() as usize;
        let pixels = self.pixmap.pixels_mut();
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                let pixel = *src.get_pixel(x as u32, y as u32);
                pixels[y as usize * width + x as usize] = premultiply(pixel.0);
                self.source.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }

    /// Restrict all further drawing to `region`
    pub fn set_clip(&mut self, region: Rect) {
        self.clip = region.intersect(self.area()).and_then(|r| {
            let rect = to_skia_rect(r)?;
            let mut mask = Mask::new(self.width(), self.height())?;
            mask.fill_path(
                &PathBuilder::from_rect(rect),
                FillRule::Winding,
                false,
                Transform::identity(),
            );
            Some(mask)
        });
    }

    pub(crate) fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.pixmap.fill_path(
            path,
            paint,
            FillRule::Winding,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, stroke: &Stroke) {
        self.pixmap
            .stroke_path(path, paint, stroke, Transform::identity(), self.clip.as_ref());
    }

    fn fill_rect(&mut self, rect: tiny_skia::Rect, paint: &Paint) {
        self.pixmap
            .fill_rect(rect, paint, Transform::identity(), self.clip.as_ref());
    }
}

impl Annotation {
    /// Draw this annotation on top of the canvas
    pub fn render(&self, canvas: &mut Canvas) {
        match self {
            Annotation::Rectangle(r) => draw_rectangle(canvas, r),
            Annotation::Arrow(a) => draw_arrow(canvas, a),
            Annotation::Freehand(f) => draw_freehand(canvas, f),
            Annotation::Text(t) => text::draw_text(canvas, t),
            Annotation::Redaction(r) => draw_redaction(canvas, r),
            Annotation::Highlight(h) => draw_highlight(canvas, h),
        }
    }
}

pub(crate) fn solid_paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = anti_alias;
    paint
}

fn premultiply([r, g, b, a]: [u8; 4]) -> PremultipliedColorU8 {
    ColorU8::from_rgba(r, g, b, a).premultiply()
}

fn to_skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
}

/// Stroke a path, drawing the dark shadow border first when enabled
fn stroke_with_shadow(canvas: &mut Canvas, path: &Path, style: &StrokeStyle) {
    let width = style.width.max(1.0);

    if style.shadow {
        let [r, g, b, a] = shadow::RGBA;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: width + StrokeStyle::SHADOW_OUTLINE * 2.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        canvas.stroke_path(path, &paint, &stroke);
    }

    let paint = solid_paint(style.color, true);
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    canvas.stroke_path(path, &paint, &stroke);
}

fn draw_rectangle(canvas: &mut Canvas, rect: &RectangleAnnotation) {
    let (min_x, min_y, max_x, max_y) =
        normalize_rect(rect.start.x, rect.start.y, rect.end.x, rect.end.y);

    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    stroke_with_shadow(canvas, &path, &rect.stroke);
}

/// Build an arrow path as stroked lines (shaft + two angled head lines)
fn build_arrow_path(
    start_x: f32,
    start_y: f32,
    end_x: f32,
    end_y: f32,
    head_size: f32,
) -> Option<Path> {
    let (head1_x, head1_y, head2_x, head2_y) =
        arrow::head_points(start_x, start_y, end_x, end_y, head_size)?;

    let mut pb = PathBuilder::new();

    // Shaft
    pb.move_to(start_x, start_y);
    pb.line_to(end_x, end_y);

    pb.move_to(end_x, end_y);
    pb.line_to(head1_x, head1_y);

    pb.move_to(end_x, end_y);
    pb.line_to(head2_x, head2_y);

    pb.finish()
}

fn draw_arrow(canvas: &mut Canvas, arrow_ann: &ArrowAnnotation) {
    let head_size = arrow::head_size(arrow_ann.stroke.width);
    let Some(path) = build_arrow_path(
        arrow_ann.start.x,
        arrow_ann.start.y,
        arrow_ann.end.x,
        arrow_ann.end.y,
        head_size,
    ) else {
        // Too short to tell which way it points
        return;
    };

    stroke_with_shadow(canvas, &path, &arrow_ann.stroke);
}

fn draw_freehand(canvas: &mut Canvas, freehand: &FreehandAnnotation) {
    let Some((first, rest)) = freehand.points.split_first() else {
        return;
    };

    if rest.is_empty() {
        // A single click leaves a dot the size of the pen
        let radius = freehand.stroke.width.max(1.0) * 0.5;
        if let Some(dot) = PathBuilder::from_circle(first.x, first.y, radius) {
            let paint = solid_paint(freehand.stroke.color, true);
            canvas.fill_path(&dot, &paint);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    stroke_with_shadow(canvas, &path, &freehand.stroke);
}

/// Replace covered pixels with the fill color.
///
/// Source blending without antialiasing on a pixel-aligned box, so every
/// covered pixel ends up exactly equal to the fill.
fn draw_redaction(canvas: &mut Canvas, redact: &RedactionAnnotation) {
    let Some(area) = Rect::from_points(redact.start, redact.end).intersect(canvas.area()) else {
        return;
    };
    let Some(rect) = to_skia_rect(area) else {
        return;
    };

    let mut paint = solid_paint(redact.fill, false);
    paint.blend_mode = BlendMode::Source;
    canvas.fill_rect(rect, &paint);
}

fn draw_highlight(canvas: &mut Canvas, highlight: &HighlightAnnotation) {
    let Some(area) = Rect::from_points(highlight.start, highlight.end).intersect(canvas.area())
    else {
        return;
    };
    let Some(rect) = to_skia_rect(area) else {
        return;
    };

    let paint = solid_paint(highlight.color, false);
    canvas.fill_rect(rect, &paint);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32, rgba: [u8; 4]) -> Canvas {
        Canvas::from_rgba(RgbaImage::from_pixel(w, h, image::Rgba(rgba))).unwrap()
    }

    #[test]
    fn test_opaque_pixels_survive_round_trip() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, image::Rgba([1, 2, 3, 255]));
        img.put_pixel(1, 0, image::Rgba([200, 100, 50, 255]));
        img.put_pixel(2, 0, image::Rgba([0, 0, 0, 0]));
        let out = Canvas::from_rgba(img.clone()).unwrap().into_rgba();
        assert_eq!(out, img);
    }

    #[test]
    fn test_translucent_pixels_survive_round_trip() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, image::Rgba([200, 100, 50, 128]));
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 0]));
        img.put_pixel(2, 0, image::Rgba([201, 99, 47, 77]));
        let out = Canvas::from_rgba(img.clone()).unwrap().into_rgba();
        assert_eq!(out, img);
    }

    #[test]
    fn test_drawing_keeps_untouched_translucent_pixels() {
        let mut img = RgbaImage::from_pixel(4, 1, image::Rgba([201, 99, 47, 77]));
        img.put_pixel(3, 0, image::Rgba([10, 20, 30, 0]));
        let mut c = Canvas::from_rgba(img.clone()).unwrap();
        Annotation::redaction((0.0, 0.0), (1.0, 1.0), Color::BLACK).render(&mut c);
        let out = c.into_rgba();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        for x in 1..4 {
            assert_eq!(out.get_pixel(x, 0), img.get_pixel(x, 0), "pixel {x}");
        }
    }

    #[test]
    fn test_canvas_size_limits() {
        assert_eq!(
            ensure_drawable(0, 5),
            Err(RenderError::EmptyImage {
                width: 0,
                height: 5
            })
        );
        assert_eq!(
            ensure_drawable(MAX_WIDTH + 1, 1),
            Err(RenderError::TooLarge {
                width: MAX_WIDTH + 1,
                height: 1
            })
        );
        assert_eq!(ensure_drawable(1920, 1080), Ok(()));
    }

    #[test]
    fn test_redaction_replaces_pixels() {
        let mut c = canvas(30, 30, [250, 240, 230, 255]);
        Annotation::redaction((0.0, 0.0), (20.0, 20.0), Color::BLACK).render(&mut c);
        let out = c.into_rgba();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(19, 19).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(20, 20).0, [250, 240, 230, 255]);
    }

    #[test]
    fn test_translucent_redaction_still_replaces() {
        let mut c = canvas(10, 10, [255, 255, 255, 255]);
        let fill = Color::rgba(0.0, 0.0, 0.0, 0.5);
        Annotation::redaction((0.0, 0.0), (10.0, 10.0), fill).render(&mut c);
        let out = c.into_rgba();
        // Nothing of the white base shows through
        let [r, g, b, a] = out.get_pixel(5, 5).0;
        assert_eq!((r, g, b), (0, 0, 0));
        assert_eq!(a, 128);
    }

    #[test]
    fn test_highlight_blends_over_base() {
        let mut c = canvas(10, 10, [0, 0, 255, 255]);
        Annotation::highlight((0.0, 0.0), (10.0, 10.0), Color::YELLOW.with_alpha(0.35))
            .render(&mut c);
        let out = c.into_rgba();
        let [r, _, b, a] = out.get_pixel(3, 3).0;
        assert!(r > 0 && r < 255);
        assert!(b > 0 && b < 255);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_clip_limits_drawing() {
        let mut c = canvas(20, 20, [255, 255, 255, 255]);
        c.set_clip(Rect::new(0, 0, 10, 20));
        Annotation::redaction((0.0, 0.0), (20.0, 20.0), Color::BLACK).render(&mut c);
        let out = c.into_rgba();
        assert_eq!(out.get_pixel(9, 5).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(10, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_rectangle_outline_leaves_interior() {
        let mut c = canvas(100, 100, [255, 255, 255, 255]);
        let stroke = StrokeStyle::new(Color::RED, 3.0);
        Annotation::rectangle((10.0, 10.0), (50.0, 50.0), stroke).render(&mut c);
        let out = c.into_rgba();
        assert_eq!(out.get_pixel(30, 30).0, [255, 255, 255, 255]);
        assert_ne!(out.get_pixel(10, 30).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_single_point_freehand_draws_dot() {
        let mut c = canvas(20, 20, [255, 255, 255, 255]);
        let stroke = StrokeStyle::new(Color::BLACK, 6.0);
        Annotation::freehand(vec![(10.0, 10.0).into()], stroke).render(&mut c);
        let out = c.into_rgba();
        assert_eq!(out.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
