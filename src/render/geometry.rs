//! Shared geometry calculations for annotations
//!
//! Constants and math used both for drawing and for computing annotation
//! bounds, so the two can never disagree.

/// Arrow geometry
pub mod arrow {
    /// Reference shaft thickness the head proportions are tuned for
    pub const THICKNESS: f32 = 4.0;
    /// Arrowhead size at the reference thickness
    pub const HEAD_SIZE: f32 = 16.0;
    /// Smallest arrowhead drawn for thin strokes
    pub const MIN_HEAD_SIZE: f32 = 8.0;
    /// Arrowhead angle from shaft in radians (35 degrees)
    pub const HEAD_ANGLE: f32 = 0.610_865_2; // 35.0_f32.to_radians()
    /// Minimum arrow length to be drawn
    pub const MIN_LENGTH: f32 = 5.0;

    /// Arrowhead size scaled to the stroke width
    pub fn head_size(stroke_width: f32) -> f32 {
        (stroke_width * HEAD_SIZE / THICKNESS).max(MIN_HEAD_SIZE)
    }

    /// Calculate arrow head points given start, end, and head size
    /// Returns (head1_x, head1_y, head2_x, head2_y) for the two head lines
    pub fn head_points(
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        head_size: f32,
    ) -> Option<(f32, f32, f32, f32)> {
        let dx = end_x - start_x;
        let dy = end_y - start_y;
        let length = (dx * dx + dy * dy).sqrt();
        if length < MIN_LENGTH {
            return None;
        }

        // Unit direction vector (pointing from start to end)
        let nx = dx / length;
        let ny = dy / length;

        let cos_a = HEAD_ANGLE.cos();
        let sin_a = HEAD_ANGLE.sin();

        // First head line (rotated clockwise from arrow direction)
        let head1_dx = -nx * cos_a - (-ny) * sin_a;
        let head1_dy = -nx * sin_a + (-ny) * cos_a;

        // Second head line (rotated counter-clockwise)
        let head2_dx = -nx * cos_a + (-ny) * sin_a;
        let head2_dy = -nx * (-sin_a) + (-ny) * cos_a;

        Some((
            end_x + head1_dx * head_size,
            end_y + head1_dy * head_size,
            end_x + head2_dx * head_size,
            end_y + head2_dy * head_size,
        ))
    }
}

/// Shadow paint shared by stroked shapes
pub mod shadow {
    /// Shadow color as RGBA
    pub const RGBA: [u8; 4] = [0, 0, 0, 220];
}

/// Bitmap text layout
pub mod text {
    /// Glyph cells are square, `GLYPH_CELLS` font pixels per side
    pub const GLYPH_CELLS: usize = 8;
    /// Distance between baselines as a multiple of the font size
    pub const LINE_SPACING: f32 = 1.25;

    /// Size of one font pixel for a given font size
    #[inline]
    pub fn cell_size(font_size: f32) -> f32 {
        font_size / GLYPH_CELLS as f32
    }

    /// Laid-out (width, height) of `content`; lines break only at `\n`
    pub fn measure(content: &str, font_size: f32) -> (f32, f32) {
        if content.is_empty() {
            return (0.0, 0.0);
        }
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in content.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        let width = widest as f32 * font_size;
        let height = font_size + (lines - 1) as f32 * font_size * LINE_SPACING;
        (width, height)
    }
}
