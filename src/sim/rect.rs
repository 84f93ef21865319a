//! Axis-aligned rectangle geometry for actor bounds and level colliders
//!
//! A rectangle is defined by its top-left corner `(x, y)` and its extent
//! `(w, h)`. The y axis grows downward. All tests use closed intervals:
//! touching edges count as overlapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle with top-left at `pos` and the given size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Vec2 {
        self.min() + self.size() * 0.5
    }

    /// Same rectangle moved so its top-left sits at `pos`
    pub fn at(&self, pos: Vec2) -> Self {
        Self::new(pos.x, pos.y, self.w, self.h)
    }

    /// Closed-interval AABB overlap (touching counts)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && self.x + self.w >= other.x
            && self.y <= other.y + other.h
            && self.y + self.h >= other.y
    }

    /// Check if a point is inside the rectangle (edges included)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Finite coordinates and non-negative extent
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) && self.w >= 0.0 && self.h >= 0.0
    }
}
