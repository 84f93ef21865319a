//! Combat model: damage, push-back, death, battle mode and shooting

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::body::Direction;
use super::feedback::{AnimTag, Feedback, SoundEffect};
use crate::consts::*;
use crate::{Timestamp, elapsed};

/// Retriggerable "in combat" window, polled every tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BattleMode {
    expires_at: Option<Timestamp>,
}

impl BattleMode {
    /// Enter or refresh battle mode until `now + timeout`
    pub fn enter(&mut self, now: Timestamp, timeout: f32) {
        self.expires_at = Some(now + timeout as f64);
    }

    /// Clear if expired. Returns true when it was cleared by this call.
    pub fn update(&mut self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(at) if now >= at => {
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.expires_at.is_some()
    }
}

/// Hit-scan weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapon {
    /// Maximum shot distance
    pub range: f32,
    pub damage: f32,
    /// Minimum seconds between shots
    pub cooldown: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            range: 400.0,
            damage: 25.0,
            cooldown: 0.25,
        }
    }
}

impl Actor {
    /// Apply `damage` coming from `origin`.
    ///
    /// Knocks the actor away from `origin` horizontally and pops it up a
    /// little. Returns true only on the call that kills the actor; calls on a
    /// dead actor do nothing and return false.
    pub fn hurt(&mut self, damage: f32, origin: Vec2, now: Timestamp, fx: &mut dyn Feedback) -> bool {
        if !self.is_alive() {
            return false;
        }

        let push = if origin.x <= self.center().x { 1.0 } else { -1.0 };
        self.body.vel = Vec2::new(
            push * damage * PUSH_BACK_PER_DAMAGE,
            self.body.vel.y - damage * POP_UP_PER_DAMAGE,
        );

        self.hitpoints -= damage;
        if self.hitpoints <= 0.0 {
            self.hitpoints = 0.0;
            self.died_at = Some(now);
            self.body.direction = Direction::Idle;
            self.cue(AnimTag::Die, fx);
            fx.play_sound(SoundEffect::Death, self.center());
            log::debug!("actor {} died", self.id);
            return true;
        }

        // Hurt is transient: always re-sent even if already showing
        self.tag = AnimTag::Hurt;
        fx.set_tag(self.id, AnimTag::Hurt);
        fx.play_sound(SoundEffect::Hurt, self.center());
        self.battle.enter(now, BATTLE_MODE_TIMEOUT);
        false
    }

    /// Whether the weapon is ready
    pub fn can_shoot(&self, weapon: &Weapon, now: Timestamp) -> bool {
        self.is_alive()
            && self
                .last_shot_at
                .is_none_or(|at| elapsed(now, at) >= weapon.cooldown)
    }

    /// Fire if possible: records the shot time (heard by enemies), enters
    /// battle mode and plays the shot sound. The caller resolves the hit.
    pub fn try_shoot(&mut self, weapon: &Weapon, now: Timestamp, fx: &mut dyn Feedback) -> bool {
        if !self.can_shoot(weapon, now) {
            return false;
        }
        self.last_shot_at = Some(now);
        self.battle.enter(now, BATTLE_MODE_TIMEOUT);
        fx.play_sound(SoundEffect::Shot, self.head());
        true
    }
}
