//! Kinematic body: per-tick integration and axis-separated collision
//!
//! Horizontal motion accelerates toward the intended direction (with reduced
//! traction in the air), gravity always accumulates, and the tentative move
//! is resolved one axis at a time against the static colliders: X first at
//! the old Y, then Y at the (possibly reverted) X.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::ColliderRegistry;
use super::rect::Rect;
use crate::approach;
use crate::consts::*;

/// Horizontal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Idle,
    Right,
}

impl Direction {
    /// -1, 0 or 1
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Idle => 0.0,
            Direction::Right => 1.0,
        }
    }
}

/// Movement tuning for one kind of actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    /// Horizontal speed cap (units/s)
    pub max_speed: f32,
    /// Horizontal acceleration toward the intended direction (units/s²)
    pub acceleration: f32,
    /// Horizontal deceleration when idle (units/s²)
    pub deceleration: f32,
    /// Initial upward speed of a full jump (units/s)
    pub jump_power: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            max_speed: 160.0,
            acceleration: 900.0,
            deceleration: 1200.0,
            jump_power: 420.0,
        }
    }
}

/// What happened during one integration step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyStep {
    /// Position was written this tick
    pub moved: bool,
    /// Horizontal move was blocked
    pub hit_x: bool,
    /// Vertical move was blocked
    pub hit_y: bool,
    /// Went from airborne to grounded this tick
    pub landed: bool,
}

/// Position/velocity state of an animate actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Top-left corner of the bounds
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bounds extent
    pub size: Vec2,
    pub direction: Direction,
    pub on_ground: bool,
    pub jumping: bool,
    pub falling: bool,
}

impl KinematicBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            direction: Direction::Idle,
            on_ground: false,
            jumping: false,
            falling: false,
        }
    }

    /// Bounds at the current position
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn bounds_at(&self, pos: Vec2) -> Rect {
        Rect::from_pos_size(pos, self.size)
    }

    /// Advance one tick. `dt` is expected to be clamped by the caller.
    pub fn integrate(&mut self, dt: f32, tuning: &BodyTuning, colliders: &ColliderRegistry) -> BodyStep {
        let was_on_ground = self.on_ground;
        let traction = if self.on_ground { GROUND_TRACTION } else { AIR_TRACTION };

        // Horizontal acceleration / deceleration
        match self.direction {
            Direction::Idle => {
                self.vel.x = approach(self.vel.x, 0.0, tuning.deceleration * traction * dt);
            }
            dir => {
                self.vel.x += dir.sign() * tuning.acceleration * traction * dt;
                self.vel.x = self.vel.x.clamp(-tuning.max_speed, tuning.max_speed);
            }
        }

        // Gravity is never suppressed, only cancelled by a ground hit
        self.vel.y += GRAVITY * dt;

        let mut step = BodyStep::default();
        let mut new_pos = self.pos + self.vel * dt;

        if colliders.collides_with(&self.bounds_at(Vec2::new(new_pos.x, self.pos.y))) {
            new_pos.x = self.pos.x;
            self.vel.x = 0.0;
            step.hit_x = true;
        }

        if colliders.collides_with(&self.bounds_at(new_pos)) {
            // Only a downward hit counts as landing
            self.on_ground = self.vel.y > 0.0;
            new_pos.y = self.pos.y;
            self.vel.y = 0.0;
            step.hit_y = true;

            if self.on_ground {
                self.jumping = false;
                self.falling = false;
            } else if !self.jumping {
                self.falling = true;
            }
        } else {
            self.on_ground = false;
            if self.vel.y > 0.0 {
                self.falling = true;
            }
        }

        step.landed = self.on_ground && !was_on_ground;

        if new_pos != self.pos {
            self.pos = new_pos;
            step.moved = true;
        }

        step
    }

    /// Start a jump. Returns false (and does nothing) unless grounded.
    pub fn jump(&mut self, factor: f32, tuning: &BodyTuning) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel.y = -tuning.jump_power * factor;
        self.jumping = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = SIM_DT;

    fn floor() -> ColliderRegistry {
        ColliderRegistry::new([Rect::new(-1000.0, 100.0, 2000.0, 20.0)])
    }

    /// Drop a body onto the floor and let it come to rest
    fn grounded_body(colliders: &ColliderRegistry) -> KinematicBody {
        let mut body = KinematicBody::new(Vec2::new(0.0, 60.0), Vec2::new(16.0, 32.0));
        for _ in 0..120 {
            body.integrate(DT, &BodyTuning::default(), colliders);
        }
        assert!(body.on_ground, "body should settle on the floor");
        body
    }

    #[test]
    fn test_free_fall_accumulates_gravity() {
        let mut body = KinematicBody::new(Vec2::ZERO, Vec2::new(16.0, 32.0));
        let step = body.integrate(DT, &BodyTuning::default(), &ColliderRegistry::empty());
        assert!(step.moved);
        assert!(!body.on_ground);
        assert!((body.vel.y - GRAVITY * DT).abs() < 1e-4);
        assert!(body.pos.y > 0.0);
        assert!(body.falling);
    }

    #[test]
    fn test_lands_on_floor() {
        let colliders = floor();
        let body = grounded_body(&colliders);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.jumping);
        assert!(!body.falling);
        // Never sinks into the floor
        assert!(body.pos.y + body.size.y < 100.0);
    }

    #[test]
    fn test_grounded_body_stays_grounded_every_tick() {
        let colliders = floor();
        let mut body = grounded_body(&colliders);
        for _ in 0..30 {
            let step = body.integrate(DT, &BodyTuning::default(), &colliders);
            assert!(body.on_ground);
            assert!(step.hit_y);
            assert!(!step.moved);
        }
    }

    #[test]
    fn test_ceiling_hit_does_not_ground() {
        let colliders = ColliderRegistry::new([Rect::new(-100.0, -20.0, 200.0, 10.0)]);
        let mut body = KinematicBody::new(Vec2::new(0.0, -8.0), Vec2::new(16.0, 32.0));
        body.vel.y = -300.0;
        let step = body.integrate(DT, &BodyTuning::default(), &colliders);
        assert!(step.hit_y);
        assert!(!body.on_ground);
        assert!(body.falling);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.pos.y, -8.0);
    }

    #[test]
    fn test_wall_blocks_horizontal_only() {
        let colliders = ColliderRegistry::new([Rect::new(20.0, -500.0, 10.0, 1000.0)]);
        let mut body = KinematicBody::new(Vec2::new(3.0, 0.0), Vec2::new(16.0, 32.0));
        body.vel.x = 160.0;
        body.direction = Direction::Right;
        let step = body.integrate(DT, &BodyTuning::default(), &colliders);
        assert!(step.hit_x);
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(body.pos.x, 3.0);
        // Still falls
        assert!(body.pos.y > 0.0);
    }

    #[test]
    fn test_walk_accelerates_and_clamps() {
        let colliders = floor();
        let mut body = grounded_body(&colliders);
        let tuning = BodyTuning::default();
        body.direction = Direction::Right;
        body.integrate(DT, &tuning, &colliders);
        assert!((body.vel.x - tuning.acceleration * DT).abs() < 1e-3);
        for _ in 0..120 {
            body.integrate(DT, &tuning, &colliders);
        }
        assert_eq!(body.vel.x, tuning.max_speed);
        assert!(body.pos.x > 0.0);
    }

    #[test]
    fn test_air_control_is_reduced() {
        let tuning = BodyTuning::default();
        let mut body = KinematicBody::new(Vec2::ZERO, Vec2::new(16.0, 32.0));
        body.direction = Direction::Left;
        body.integrate(DT, &tuning, &ColliderRegistry::empty());
        let expected = -tuning.acceleration * AIR_TRACTION * DT;
        assert!((body.vel.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_jump_requires_ground() {
        let tuning = BodyTuning::default();
        let mut airborne = KinematicBody::new(Vec2::ZERO, Vec2::new(16.0, 32.0));
        assert!(!airborne.jump(1.0, &tuning));
        assert!(!airborne.jumping);
        assert_eq!(airborne.vel.y, 0.0);
    }

    #[test]
    fn test_jump_leaves_floor_next_tick() {
        let colliders = floor();
        let tuning = BodyTuning::default();
        let mut body = grounded_body(&colliders);
        assert!(body.jump(1.0, &tuning));
        assert!(body.jumping);
        assert!(body.on_ground, "jump itself does not clear on_ground");

        body.integrate(DT, &tuning, &colliders);
        assert!(body.vel.y < 0.0);
        assert!(body.jumping);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_jump_factor_scales_power() {
        let colliders = floor();
        let tuning = BodyTuning::default();
        let mut body = grounded_body(&colliders);
        body.jump(0.5, &tuning);
        assert_eq!(body.vel.y, -tuning.jump_power * 0.5);
    }

    #[test]
    fn test_resting_body_without_velocity_keeps_position() {
        let colliders = floor();
        let mut body = grounded_body(&colliders);
        let before = body.pos;
        let step = body.integrate(DT, &BodyTuning::default(), &colliders);
        assert!(!step.moved);
        assert_eq!(body.pos, before);
    }

    proptest! {
        #[test]
        fn prop_idle_deceleration_never_overshoots(vx in -500.0f32..500.0, dt in 0.0f32..MAX_DT) {
            let mut body = KinematicBody::new(Vec2::ZERO, Vec2::new(16.0, 32.0));
            body.vel.x = vx;
            body.integrate(dt, &BodyTuning::default(), &ColliderRegistry::empty());
            prop_assert!(body.vel.x.abs() <= vx.abs());
            prop_assert!(body.vel.x == 0.0 || body.vel.x.signum() == vx.signum());
        }

        #[test]
        fn prop_walk_speed_stays_clamped(vx in -160.0f32..160.0, right in any::<bool>(), dt in 0.0f32..MAX_DT) {
            let tuning = BodyTuning::default();
            let mut body = KinematicBody::new(Vec2::ZERO, Vec2::new(16.0, 32.0));
            body.vel.x = vx;
            body.direction = if right { Direction::Right } else { Direction::Left };
            body.integrate(dt, &tuning, &ColliderRegistry::empty());
            prop_assert!(body.vel.x.abs() <= tuning.max_speed);
        }
    }
}
