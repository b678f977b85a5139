use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units, stored as edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle spanning `size` from `position`.
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        // Handles negative size by normalizing to proper min/max.
        let p1 = position + size;
        Self {
            left: position.x.min(p1.x),
            top: position.y.min(p1.y),
            right: position.x.max(p1.x),
            bottom: position.y.max(p1.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap test: rectangles that only share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Point containment, edges included.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Clamp a point into the rectangle, edges included.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        let mut p = point;
        if p.x < self.left {
            p.x = self.left;
        } else if p.x > self.right {
            p.x = self.right;
        }
        if p.y < self.top {
            p.y = self.top;
        } else if p.y > self.bottom {
            p.y = self.bottom;
        }
        p
    }
}
