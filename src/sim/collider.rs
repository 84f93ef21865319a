//! Static collider registry
//!
//! Level geometry as a flat list of axis-aligned rectangles. Built once at
//! level load and shared read-only by every actor during a tick. Queries walk
//! the full list; at this scale no spatial partitioning is needed.

use glam::Vec2;

use super::rect::Rect;

/// Index of a collider inside its registry
pub type ColliderId = u32;

/// An immutable piece of level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub id: ColliderId,
    pub rect: Rect,
}

/// Read-only set of static colliders
#[derive(Debug, Clone, Default)]
pub struct ColliderRegistry {
    colliders: Vec<StaticCollider>,
}

impl ColliderRegistry {
    /// Build the registry from level rectangles (ids follow input order)
    pub fn new<I>(rects: I) -> Self
    where
        I: IntoIterator<Item = Rect>,
    {
        let colliders = rects
            .into_iter()
            .enumerate()
            .map(|(i, rect)| StaticCollider { id: i as ColliderId, rect })
            .collect();
        Self { colliders }
    }

    /// Registry with no geometry (every query misses)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// True if the query rectangle overlaps any collider (touching counts)
    pub fn collides_with_rectangle(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.collides_with(&Rect::new(x, y, w, h))
    }

    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.colliders.iter().any(|c| c.rect.overlaps(rect))
    }

    /// True if any collider contains the point
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.collider_at(p).is_some()
    }

    /// Some collider containing the point. Which one is unspecified when
    /// colliders overlap.
    pub fn collider_at(&self, p: Vec2) -> Option<ColliderId> {
        self.colliders
            .iter()
            .find(|c| c.rect.contains_point(p))
            .map(|c| c.id)
    }
}
