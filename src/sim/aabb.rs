//! Axis-aligned bounding boxes in screen space
//!
//! Screen space has its origin at the top-left and y growing downward, so
//! `top() < bottom()` for every non-empty box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap on the x axis (touching edges do not count)
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.top() < other.bottom() && other.top() < self.bottom()
    }

    /// Point containment, inclusive on the top/left edges
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
