//! Color, stroke and font styles shared by all annotations

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color, each channel in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Default annotation red
    pub const RED: Color = Color::rgb(0.9, 0.1, 0.1);
    pub const YELLOW: Color = Color::rgb(1.0, 0.9, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert to 8-bit RGBA (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

/// Outline style for rectangles, arrows and freehand strokes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in image pixels
    pub width: f32,
    /// Draw a dark border under the stroke for contrast
    pub shadow: bool,
}

impl StrokeStyle {
    /// Shadow border thickness added on each side of the stroke
    pub const SHADOW_OUTLINE: f32 = 2.0;

    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            shadow: false,
        }
    }

    pub fn with_shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }

    /// How far the painted stroke can reach beyond its centerline
    pub fn reach(&self) -> f32 {
        let half = self.width.max(1.0) * 0.5;
        if self.shadow {
            half + Self::SHADOW_OUTLINE
        } else {
            half
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            width: 3.0,
            shadow: true,
        }
    }
}

/// Text font; glyphs come from a fixed bitmap face scaled to `size`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Glyph cell height in image pixels
    pub size: f32,
}

impl Font {
    pub fn new(size: f32) -> Self {
        Self { size }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self { size: 16.0 }
    }
}
