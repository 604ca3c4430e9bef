//! Annotation types for marking up captured images
//!
//! All annotation types store coordinates in base-image pixel space.
//! Annotations are immutable values: an edit replaces one with another.

use super::geometry::{Point, Rect};
use super::style::{Color, Font, StrokeStyle};
use crate::render::geometry::{arrow, text};

/// Outline rectangle annotation (no fill)
#[derive(Clone, Debug, PartialEq)]
pub struct RectangleAnnotation {
    pub start: Point,
    pub end: Point,
    pub stroke: StrokeStyle,
}

/// Arrow from `start` with its head at `end`
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowAnnotation {
    pub start: Point,
    pub end: Point,
    pub stroke: StrokeStyle,
}

/// Freehand stroke through a sequence of points
#[derive(Clone, Debug, PartialEq)]
pub struct FreehandAnnotation {
    pub points: Vec<Point>,
    pub stroke: StrokeStyle,
}

/// Text label; `baseline` is the bottom-left corner of the first line
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    pub content: String,
    pub baseline: Point,
    pub font: Font,
    pub color: Color,
}

/// Solid block that replaces the covered pixels
#[derive(Clone, Debug, PartialEq)]
pub struct RedactionAnnotation {
    pub start: Point,
    pub end: Point,
    pub fill: Color,
}

/// Translucent marker box drawn over the covered pixels
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightAnnotation {
    pub start: Point,
    pub end: Point,
    pub color: Color,
}

/// Unified annotation type for ordered drawing and undo/redo
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Rectangle(RectangleAnnotation),
    Arrow(ArrowAnnotation),
    Freehand(FreehandAnnotation),
    Text(TextAnnotation),
    Redaction(RedactionAnnotation),
    Highlight(HighlightAnnotation),
}

impl Annotation {
    pub fn rectangle(start: impl Into<Point>, end: impl Into<Point>, stroke: StrokeStyle) -> Self {
        Annotation::Rectangle(RectangleAnnotation {
            start: start.into(),
            end: end.into(),
            stroke,
        })
    }

    pub fn arrow(start: impl Into<Point>, end: impl Into<Point>, stroke: StrokeStyle) -> Self {
        Annotation::Arrow(ArrowAnnotation {
            start: start.into(),
            end: end.into(),
            stroke,
        })
    }

    pub fn freehand(points: Vec<Point>, stroke: StrokeStyle) -> Self {
        Annotation::Freehand(FreehandAnnotation { points, stroke })
    }

    pub fn text(
        content: impl Into<String>,
        baseline: impl Into<Point>,
        font: Font,
        color: Color,
    ) -> Self {
        Annotation::Text(TextAnnotation {
            content: content.into(),
            baseline: baseline.into(),
            font,
            color,
        })
    }

    pub fn redaction(start: impl Into<Point>, end: impl Into<Point>, fill: Color) -> Self {
        Annotation::Redaction(RedactionAnnotation {
            start: start.into(),
            end: end.into(),
            fill,
        })
    }

    pub fn highlight(start: impl Into<Point>, end: impl Into<Point>, color: Color) -> Self {
        Annotation::Highlight(HighlightAnnotation {
            start: start.into(),
            end: end.into(),
            color,
        })
    }

    /// Axis-aligned box of every pixel this annotation can touch.
    ///
    /// Includes stroke width, shadow and arrowheads. Text is measured as laid
    /// out (no wrapping), so long labels extend past any nominal box.
    pub fn bounds(&self) -> Rect {
        match self {
            Annotation::Rectangle(r) => {
                Rect::from_points(r.start, r.end).inflate(r.stroke.reach().ceil() as i32)
            }
            Annotation::Arrow(a) => {
                let head = arrow::head_size(a.stroke.width);
                Rect::from_points(a.start, a.end).inflate((head + a.stroke.reach()).ceil() as i32)
            }
            Annotation::Freehand(f) => {
                let Some(first) = f.points.first() else {
                    return Rect::default();
                };
                let (mut min_x, mut min_y, mut max_x, mut max_y) =
                    (first.x, first.y, first.x, first.y);
                for p in &f.points[1..] {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                Rect::from_f32(min_x, min_y, max_x, max_y)
                    .inflate(f.stroke.reach().ceil() as i32)
            }
            Annotation::Text(t) => {
                let (width, height) = text::measure(&t.content, t.font.size);
                let top = t.baseline.y - t.font.size;
                Rect::from_f32(t.baseline.x, top, t.baseline.x + width, top + height)
            }
            Annotation::Redaction(r) => Rect::from_points(r.start, r.end),
            Annotation::Highlight(h) => Rect::from_points(h.start, h.end),
        }
    }

    /// Check if this annotation obscures pixels (as opposed to marking them)
    pub fn is_redaction(&self) -> bool {
        matches!(self, Annotation::Redaction(_))
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Annotation::Rectangle(_) => "rectangle",
            Annotation::Arrow(_) => "arrow",
            Annotation::Freehand(_) => "freehand",
            Annotation::Text(_) => "text",
            Annotation::Redaction(_) => "redaction",
            Annotation::Highlight(_) => "highlight",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_bounds_include_stroke() {
        let stroke = StrokeStyle::new(Color::RED, 4.0);
        let ann = Annotation::rectangle((10.0, 10.0), (50.0, 50.0), stroke);
        assert_eq!(ann.bounds(), Rect::new(8, 8, 52, 52));
    }

    #[test]
    fn test_redaction_bounds_are_exact() {
        let ann = Annotation::redaction((20.0, 20.0), (0.0, 0.0), Color::BLACK);
        assert_eq!(ann.bounds(), Rect::new(0, 0, 20, 20));
        assert!(ann.is_redaction());
    }

    #[test]
    fn test_text_bounds_extend_with_content() {
        let font = Font::new(8.0);
        let short = Annotation::text("A", (5.0, 13.0), font, Color::BLACK);
        let long = Annotation::text("ABCD", (5.0, 13.0), font, Color::BLACK);
        assert_eq!(short.bounds(), Rect::new(5, 5, 13, 13));
        assert_eq!(long.bounds(), Rect::new(5, 5, 37, 13));
    }

    #[test]
    fn test_multiline_text_grows_downward() {
        let font = Font::new(8.0);
        let ann = Annotation::text("AB\nC", (0.0, 8.0), font, Color::BLACK);
        let b = ann.bounds();
        assert_eq!((b.left, b.top, b.right), (0, 0, 16));
        assert_eq!(b.bottom, 18);
    }

    #[test]
    fn test_empty_freehand_has_empty_bounds() {
        let ann = Annotation::freehand(Vec::new(), StrokeStyle::default());
        assert!(ann.bounds().is_empty());
    }

    #[test]
    fn test_arrow_bounds_cover_head() {
        let stroke = StrokeStyle::new(Color::RED, 4.0);
        let ann = Annotation::arrow((10.0, 50.0), (90.0, 50.0), stroke);
        let b = ann.bounds();
        assert!(b.left <= 10 && b.right >= 90);
        assert!(b.top < 50 - 8 && b.bottom > 50 + 8);
    }
}
