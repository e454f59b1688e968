//! Axis-aligned rectangles
//!
//! World space: origin at the top-left, +y points down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict AABB overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Length of the shared horizontal extent (0 when disjoint)
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        (self.right().min(other.right()) - self.left().max(other.left())).max(0.0)
    }

    /// Grow the rect by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.w + amount * 2.0,
            self.h + amount * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_horizontal_overlap() {
        let platform = Rect::new(300.0, 580.0, 120.0, 20.0);
        let player = Rect::new(310.0, 530.0, 30.0, 48.0);
        assert_eq!(player.horizontal_overlap(&platform), 30.0);
        let away = Rect::new(500.0, 0.0, 10.0, 10.0);
        assert_eq!(away.horizontal_overlap(&platform), 0.0);
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0).inflate(5.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 20.0, 20.0));
    }
}
