//! Simulated characters
//!
//! An actor is a kinematic body plus combat state. Players and enemies share
//! this type; enemy behavior lives in [`super::ai`] and is attached
//! alongside, never inside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyStep, BodyTuning, Direction, KinematicBody};
use super::collider::ColliderRegistry;
use super::combat::BattleMode;
use super::feedback::{AnimTag, Feedback};
use super::rect::Rect;
use crate::Timestamp;

/// Unique actor handle within a world
pub type ActorId = u32;

/// Which registry an actor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy,
}

impl Role {
    /// The role this role fights against
    pub fn opponent(self) -> Role {
        match self {
            Role::Player => Role::Enemy,
            Role::Enemy => Role::Player,
        }
    }
}

/// A simulated character
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
    pub body: KinematicBody,
    pub tuning: BodyTuning,
    /// Never negative; the actor is alive iff this is above zero
    pub(crate) hitpoints: f32,
    /// Facing left (sprite mirrored)
    pub mirrored: bool,
    /// Distance from the top of the bounds down to the eyes/muzzle
    pub head_offset: f32,
    pub battle: BattleMode,
    pub died_at: Option<Timestamp>,
    pub last_shot_at: Option<Timestamp>,
    /// Last animation tag sent to the feedback sink
    pub tag: AnimTag,
}

impl Actor {
    pub fn new(id: ActorId, role: Role, pos: Vec2, size: Vec2, tuning: BodyTuning, hitpoints: f32) -> Self {
        Self {
            id,
            role,
            body: KinematicBody::new(pos, size),
            tuning,
            hitpoints,
            mirrored: false,
            head_offset: size.y * 0.2,
            battle: BattleMode::default(),
            died_at: None,
            last_shot_at: None,
            tag: AnimTag::Idle,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0.0
    }

    pub fn hitpoints(&self) -> f32 {
        self.hitpoints
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn bounds(&self) -> Rect {
        self.body.bounds()
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Eye/muzzle point used as the origin and target of hit-scans
    pub fn head(&self) -> Vec2 {
        self.body.pos + Vec2::new(self.body.size.x * 0.5, self.head_offset)
    }

    /// -1 when facing left, 1 when facing right
    pub fn facing_sign(&self) -> f32 {
        if self.mirrored { -1.0 } else { 1.0 }
    }

    /// Whether the point lies on the side this actor is facing
    pub fn is_facing(&self, point: Vec2) -> bool {
        let x = self.center().x;
        if self.mirrored { point.x <= x } else { point.x >= x }
    }

    /// Set horizontal intent. Dead actors can only idle.
    pub fn set_direction(&mut self, direction: Direction) {
        let direction = if self.is_alive() { direction } else { Direction::Idle };
        self.body.direction = direction;
        match direction {
            Direction::Left => self.mirrored = true,
            Direction::Right => self.mirrored = false,
            Direction::Idle => {}
        }
    }

    /// Jump if grounded and alive
    pub fn jump(&mut self, factor: f32) -> bool {
        self.is_alive() && self.body.jump(factor, &self.tuning)
    }

    /// Run the body integration for this tick
    pub fn step(&mut self, dt: f32, colliders: &ColliderRegistry) -> BodyStep {
        if !self.is_alive() {
            self.body.direction = Direction::Idle;
        }
        self.body.integrate(dt, &self.tuning, colliders)
    }

    /// Send an animation tag if it differs from the current one
    pub fn cue(&mut self, tag: AnimTag, fx: &mut dyn Feedback) {
        if self.tag != tag {
            self.tag = tag;
            fx.set_tag(self.id, tag);
        }
    }

    /// Animation derived from body state (idle/run/jump/fall)
    pub fn motion_tag(&self) -> AnimTag {
        if !self.body.on_ground {
            if self.body.vel.y < 0.0 { AnimTag::Jump } else { AnimTag::Fall }
        } else if self.body.vel.x.abs() > 1.0 {
            AnimTag::Run
        } else {
            AnimTag::Idle
        }
    }
}
