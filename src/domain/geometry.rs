//! Geometric types in base-image coordinate space

use serde::{Deserialize, Serialize};

/// A point in base-image coordinates (pixels, sub-pixel precision)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Integer pixel rectangle, right/bottom exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest pixel rectangle covering the box spanned by two points
    pub fn from_points(a: Point, b: Point) -> Self {
        let (min_x, min_y, max_x, max_y) = normalize_rect(a.x, a.y, b.x, b.y);
        Self::from_f32(min_x, min_y, max_x, max_y)
    }

    /// Smallest pixel rectangle covering the given float extent
    pub fn from_f32(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            left: min_x.floor() as i32,
            top: min_y.floor() as i32,
            right: max_x.ceil() as i32,
            bottom: max_y.ceil() as i32,
        }
    }

    /// Rectangle covering the whole of a `width` x `height` image
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Grow the rectangle by `amount` pixels on every side
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect {
            left: self.left.saturating_sub(amount),
            top: self.top.saturating_sub(amount),
            right: self.right.saturating_add(amount),
            bottom: self.bottom.saturating_add(amount),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes() {
        let r = Rect::from_points(Point::new(50.0, 40.5), Point::new(10.2, 10.0));
        assert_eq!(r, Rect::new(10, 10, 50, 41));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        assert_eq!(a.intersect(b), None);
        assert_eq!(
            a.intersect(Rect::new(5, 5, 15, 15)),
            Some(Rect::new(5, 5, 10, 10))
        );
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(2, 2, 4, 4);
        assert_eq!(a.union(Rect::default()), a);
        assert_eq!(
            a.union(Rect::new(-1, 3, 3, 8)),
            Rect::new(-1, 2, 4, 8)
        );
    }

    #[test]
    fn test_contains_point_is_right_exclusive() {
        let r = Rect::new(0, 0, 20, 20);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(19, 19));
        assert!(!r.contains_point(20, 5));
    }
}
