//! Stepped ray march for shots and line of sight
//!
//! The segment from `origin` to `origin + delta` is sampled at equal steps.
//! At each sample the caller's targets are tested first, then level geometry,
//! so the first positive sample in march order wins: walls occlude actors
//! behind them and nearer actors shadow farther ones.

use glam::Vec2;

use super::actor::ActorId;
use super::collider::{ColliderId, ColliderRegistry};
use super::rect::Rect;
use crate::consts::HIT_SCAN_STEP;

/// An actor the cast may hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: ActorId,
    pub bounds: Rect,
}

/// What a cast ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Actor(ActorId),
    Collider(ColliderId),
}

/// First hit along a cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanHit {
    pub hit: Hit,
    /// Sample point where the hit was detected
    pub point: Vec2,
    /// Distance from the origin to `point`
    pub distance: f32,
}

impl ScanHit {
    pub fn actor(&self) -> Option<ActorId> {
        match self.hit {
            Hit::Actor(id) => Some(id),
            Hit::Collider(_) => None,
        }
    }
}

/// Number of samples for a segment of `length` at `step` spacing
#[inline]
pub fn step_count(length: f32, step: f32) -> u32 {
    ((length / step).ceil() as u32).max(1)
}

/// March from `origin` along `delta`, returning the first hit.
///
/// Samples sit at `origin + delta * i / n` for `i = 1..=n` with
/// `n = max(1, ceil(|delta| / step))`. A non-positive step falls back to
/// [`HIT_SCAN_STEP`].
pub fn cast(
    origin: Vec2,
    delta: Vec2,
    step: f32,
    targets: &[Target],
    colliders: &ColliderRegistry,
) -> Option<ScanHit> {
    let step = if step > 0.0 && step.is_finite() {
        step
    } else {
        log::warn!("hit-scan step {} is not positive, using {}", step, HIT_SCAN_STEP);
        HIT_SCAN_STEP
    };

    let length = delta.length();
    if !length.is_finite() {
        return None;
    }
    let steps = step_count(length, step);

    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let point = origin + delta * t;

        let hit = targets
            .iter()
            .find(|target| target.bounds.contains_point(point))
            .map(|target| Hit::Actor(target.id))
            .or_else(|| colliders.collider_at(point).map(Hit::Collider));

        if let Some(hit) = hit {
            return Some(ScanHit {
                hit,
                point,
                distance: length * t,
            });
        }
    }

    None
}

/// Cast with the default step
pub fn cast_default(origin: Vec2, delta: Vec2, targets: &[Target], colliders: &ColliderRegistry) -> Option<ScanHit> {
    cast(origin, delta, HIT_SCAN_STEP, targets, colliders)
}
