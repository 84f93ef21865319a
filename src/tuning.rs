//! Data-driven game balance
//!
//! Player stats and the enemy kind table. Everything here deserializes from
//! JSON with per-field defaults, so a file only needs to list what it changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SCAN_RANGE;
use crate::error::SetupError;
use crate::sim::{Actor, ActorId, BodyTuning, EnemyKind, Role, Weapon};

/// Player stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: Vec2,
    pub head_offset: f32,
    pub hitpoints: f32,
    pub body: BodyTuning,
    pub weapon: Weapon,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(16.0, 32.0),
            head_offset: 6.0,
            hitpoints: 100.0,
            body: BodyTuning::default(),
            weapon: Weapon::default(),
        }
    }
}

impl PlayerTuning {
    /// A fresh player actor with these stats
    pub fn spawn(&self, id: ActorId, pos: Vec2) -> Actor {
        let mut actor = Actor::new(id, Role::Player, pos, self.size, self.body, self.hitpoints);
        actor.head_offset = self.head_offset;
        actor
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy_kinds: Vec<EnemyKind>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            enemy_kinds: EnemyKind::presets(),
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject duplicate kind names (compared like [`Tuning::kind`] looks them
    /// up) and scan ranges a hit-scan could not march in bounded time
    pub fn validate(&self) -> Result<(), SetupError> {
        check_range("player weapon", self.player.weapon.range)?;
        for (i, kind) in self.enemy_kinds.iter().enumerate() {
            if self.enemy_kinds[..i].iter().any(|k| k.name.eq_ignore_ascii_case(&kind.name)) {
                return Err(SetupError::DuplicateEnemyKind(kind.name.clone()));
            }
            check_range(&format!("enemy kind `{}`", kind.name), kind.attack_range)?;
        }
        Ok(())
    }

    /// Look up an enemy kind by name (case-insensitive)
    pub fn kind(&self, name: &str) -> Option<&EnemyKind> {
        self.enemy_kinds.iter().find(|k| k.name.eq_ignore_ascii_case(name))
    }
}

fn check_range(owner: &str, range: f32) -> Result<(), SetupError> {
    if range > 0.0 && range <= MAX_SCAN_RANGE {
        Ok(())
    } else {
        Err(SetupError::InvalidRange {
            owner: owner.to_string(),
            range,
        })
    }
}
