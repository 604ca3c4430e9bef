//! Annotation tools driven by pointer gestures
//!
//! Coordinates handed to these tools are already in base-image space.

use crate::config::EngineConfig;
use crate::domain::{Annotation, Color, Font, Point, StrokeStyle};

/// Drawing tool that turns a drag into an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Rectangle,
    Arrow,
    Freehand,
    Redaction,
    Highlight,
}

/// Pointer action forwarded to the active tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawAction {
    Start(f32, f32),
    Move(f32, f32),
    End(f32, f32),
}

/// Styles given to newly drawn annotations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolDefaults {
    pub stroke: StrokeStyle,
    pub font: Font,
    pub text_color: Color,
    pub redaction_fill: Color,
    pub highlight_color: Color,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for ToolDefaults {
    fn from(config: &EngineConfig) -> Self {
        Self {
            stroke: config.stroke(),
            font: config.font(),
            text_color: config.text_color,
            redaction_fill: config.redaction_color,
            highlight_color: config.highlight_color,
        }
    }
}

impl ToolDefaults {
    /// Annotation for a straight drag from `start` to `end`.
    /// A freehand drag without intermediate points becomes a straight stroke.
    pub fn build(&self, tool: Tool, start: Point, end: Point) -> Annotation {
        match tool {
            Tool::Rectangle => Annotation::rectangle(start, end, self.stroke),
            Tool::Arrow => Annotation::arrow(start, end, self.stroke),
            Tool::Freehand => Annotation::freehand(vec![start, end], self.stroke),
            Tool::Redaction => Annotation::redaction(start, end, self.redaction_fill),
            Tool::Highlight => Annotation::highlight(start, end, self.highlight_color),
        }
    }

    /// Text label with its baseline starting at `at`
    pub fn text(&self, content: impl Into<String>, at: Point) -> Annotation {
        Annotation::text(content, at, self.font, self.text_color)
    }
}

/// In-progress gesture for one tool
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    tool: Tool,
    defaults: ToolDefaults,
    start: Option<Point>,
    points: Vec<Point>,
}

impl Drawing {
    pub fn new(tool: Tool, defaults: ToolDefaults) -> Self {
        Self {
            tool,
            defaults,
            start: None,
            points: Vec::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, dropping any gesture in progress
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel();
        self.tool = tool;
    }

    pub fn set_defaults(&mut self, defaults: ToolDefaults) {
        self.defaults = defaults;
    }

    /// Whether a drag has started and not yet ended
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.points.clear();
    }

    /// Feed a pointer action; returns the finished annotation on `End`.
    ///
    /// `Move` and `End` without a preceding `Start` are ignored.
    pub fn handle(&mut self, action: DrawAction) -> Option<Annotation> {
        match action {
            DrawAction::Start(x, y) => {
                let p = Point::new(x, y);
                self.start = Some(p);
                self.points.clear();
                self.points.push(p);
                None
            }
            DrawAction::Move(x, y) => {
                if self.start.is_some() && self.tool == Tool::Freehand {
                    self.points.push(Point::new(x, y));
                }
                None
            }
            DrawAction::End(x, y) => {
                let start = self.start.take()?;
                let end = Point::new(x, y);
                let annotation = if self.tool == Tool::Freehand {
                    let mut points = std::mem::take(&mut self.points);
                    if points.last() != Some(&end) {
                        points.push(end);
                    }
                    Annotation::freehand(points, self.defaults.stroke)
                } else {
                    self.points.clear();
                    self.defaults.build(self.tool, start, end)
                };
                log::debug!("Drew {} annotation", annotation.kind());
                Some(annotation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Command, LayerStack};

    #[test]
    fn test_defaults_follow_config() {
        let config = EngineConfig {
            stroke_width: 7.0,
            shadow: false,
            font_size: 24.0,
            redaction_color: Color::WHITE,
            ..Default::default()
        };
        let defaults = config.tool_defaults();
        assert_eq!(defaults.stroke.width, 7.0);
        assert!(!defaults.stroke.shadow);
        assert_eq!(defaults.font.size, 24.0);

        let redaction = defaults.build(
            Tool::Redaction,
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
        );
        assert_eq!(
            redaction,
            Annotation::redaction((0.0, 0.0), (4.0, 4.0), Color::WHITE)
        );
    }

    #[test]
    fn test_drag_produces_annotation_once() {
        let mut drawing = Drawing::new(Tool::Arrow, ToolDefaults::default());
        assert_eq!(drawing.handle(DrawAction::Start(1.0, 2.0)), None);
        assert!(drawing.is_active());
        assert_eq!(drawing.handle(DrawAction::Move(5.0, 5.0)), None);

        let arrow = drawing.handle(DrawAction::End(30.0, 40.0)).unwrap();
        assert_eq!(
            arrow,
            Annotation::arrow((1.0, 2.0), (30.0, 40.0), StrokeStyle::default())
        );
        assert!(!drawing.is_active());
        assert_eq!(drawing.handle(DrawAction::End(30.0, 40.0)), None);
    }

    #[test]
    fn test_freehand_collects_moves() {
        let mut drawing = Drawing::new(Tool::Freehand, ToolDefaults::default());
        drawing.handle(DrawAction::Start(0.0, 0.0));
        drawing.handle(DrawAction::Move(1.0, 1.0));
        drawing.handle(DrawAction::Move(2.0, 1.0));
        let stroke = drawing.handle(DrawAction::End(2.0, 1.0)).unwrap();

        let Annotation::Freehand(freehand) = stroke else {
            panic!("expected a freehand stroke");
        };
        assert_eq!(
            freehand.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(2.0, 1.0)
            ]
        );
    }

    #[test]
    fn test_switching_tool_cancels_gesture() {
        let mut drawing = Drawing::new(Tool::Rectangle, ToolDefaults::default());
        drawing.handle(DrawAction::Start(3.0, 3.0));
        drawing.set_tool(Tool::Highlight);
        assert!(!drawing.is_active());
        assert_eq!(drawing.handle(DrawAction::End(9.0, 9.0)), None);
    }

    #[test]
    fn test_gestures_feed_layer_stack() {
        let mut stack = LayerStack::new();
        let mut drawing = Drawing::new(Tool::Redaction, ToolDefaults::default());
        for (from, to) in [((0.0, 0.0), (10.0, 10.0)), ((20.0, 5.0), (25.0, 8.0))] {
            drawing.handle(DrawAction::Start(from.0, from.1));
            if let Some(annotation) = drawing.handle(DrawAction::End(to.0, to.1)) {
                stack.apply(Command::Add(annotation)).unwrap();
            }
        }
        let label = ToolDefaults::default().text("step 3", Point::new(4.0, 40.0));
        stack.apply(Command::Add(label)).unwrap();

        assert_eq!(stack.len(), 3);
        assert!(stack.current_annotations()[..2].iter().all(Annotation::is_redaction));
        assert_eq!(stack.current_annotations()[2].kind(), "text");
    }
}
