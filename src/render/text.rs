//! Bitmap text rendering for text annotations
//!
//! Glyphs come from a built-in 8x8 face scaled to the font size, so the same
//! label renders to the same pixels on every machine.

use font8x8::{BASIC_FONTS, GREEK_FONTS, LATIN_FONTS, UnicodeFonts};
use tiny_skia::PathBuilder;

use super::geometry::text::{GLYPH_CELLS, LINE_SPACING, cell_size};
use super::image::{Canvas, solid_paint};
use crate::domain::TextAnnotation;

/// Look up the bitmap for a character, falling back to `?`
fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

pub(crate) fn draw_text(canvas: &mut Canvas, ann: &TextAnnotation) {
    if ann.content.is_empty() || ann.font.size <= 0.0 {
        return;
    }

    let cell = cell_size(ann.font.size);
    let origin_x = ann.baseline.x;
    let mut top = ann.baseline.y - ann.font.size;

    // All set glyph pixels go into one path so overlapping edges blend once
    let mut pb = PathBuilder::new();
    for line in ann.content.split('\n') {
        for (col, c) in line.chars().enumerate() {
            let left = origin_x + col as f32 * ann.font.size;
            for (row, bits) in glyph(c).iter().enumerate() {
                for bit in 0..GLYPH_CELLS {
                    if *bits & (1u8 << bit) == 0 {
                        continue;
                    }
                    if let Some(px) = tiny_skia::Rect::from_xywh(
                        left + bit as f32 * cell,
                        top + row as f32 * cell,
                        cell,
                        cell,
                    ) {
                        pb.push_rect(px);
                    }
                }
            }
        }
        top += ann.font.size * LINE_SPACING;
    }

    let Some(path) = pb.finish() else {
        // Only whitespace
        return;
    };
    let paint = solid_paint(ann.color, false);
    canvas.fill_path(&path, &paint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Annotation, Color, Font};
    use image::RgbaImage;

    fn white(w: u32, h: u32) -> Canvas {
        Canvas::from_rgba(RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]))).unwrap()
    }

    fn inked(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0 != [255, 255, 255, 255]).count()
    }

    #[test]
    fn test_text_stays_inside_bounds() {
        let ann = Annotation::text("Hi!", (4.0, 20.0), Font::new(8.0), Color::BLACK);
        let bounds = ann.bounds();
        let mut c = white(40, 40);
        ann.render(&mut c);
        let out = c.into_rgba();
        assert!(inked(&out) > 0);
        for (x, y, p) in out.enumerate_pixels() {
            if p.0 != [255, 255, 255, 255] {
                assert!(bounds.contains_point(x as i32, y as i32), "({x},{y}) outside");
            }
        }
    }

    #[test]
    fn test_whitespace_draws_nothing() {
        let mut c = white(20, 20);
        Annotation::text("  ", (0.0, 10.0), Font::new(8.0), Color::BLACK).render(&mut c);
        assert_eq!(inked(&c.into_rgba()), 0);
    }

    #[test]
    fn test_unknown_char_falls_back() {
        assert_eq!(glyph('\u{1F600}'), glyph('?'));
        assert_ne!(glyph('A'), [0; 8]);
    }

    #[test]
    fn test_larger_font_inks_more() {
        let mut small = white(64, 64);
        let mut large = white(64, 64);
        Annotation::text("A", (0.0, 16.0), Font::new(8.0), Color::BLACK).render(&mut small);
        Annotation::text("A", (0.0, 32.0), Font::new(32.0), Color::BLACK).render(&mut large);
        assert!(inked(&large.into_rgba()) > inked(&small.into_rgba()) * 4);
    }
}
