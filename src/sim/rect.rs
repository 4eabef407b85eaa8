//! Axis-aligned hit rectangles

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in arena pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of edge `size` with its top-left corner at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Interiors overlap. Rectangles that only share an edge do not intersect,
    /// and an empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Fully inside `[0, width] x [0, height]`
    pub fn within(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touching_edges() {
        let a = Rect::new(0.0, 0.0, 48.0, 48.0);
        assert!(a.intersects(&Rect::new(47.0, 47.0, 10.0, 10.0)));
        // Shared edge only
        assert!(!a.intersects(&Rect::new(48.0, 0.0, 48.0, 48.0)));
        assert!(!a.intersects(&Rect::new(0.0, 48.0, 48.0, 48.0)));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 48.0, 48.0);
        assert!(!a.intersects(&Rect::new(10.0, 10.0, 0.0, 5.0)));
    }

    #[test]
    fn test_within_bounds() {
        assert!(Rect::new(576.0, 576.0, 48.0, 48.0).within(624.0, 624.0));
        assert!(!Rect::new(577.0, 0.0, 48.0, 48.0).within(624.0, 624.0));
        assert!(!Rect::new(-1.0, 0.0, 48.0, 48.0).within(624.0, 624.0));
    }
}
