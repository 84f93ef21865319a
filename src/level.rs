//! Level description and world construction
//!
//! A level is plain data: static geometry, a player spawn and a list of enemy
//! placements by kind name. Building a [`World`] from it checks every fixture
//! up front, since a broken level is a content bug that should fail loudly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::sim::{ColliderRegistry, Rect, World};
use crate::tuning::Tuning;

/// Built-in demo level
pub const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

/// One enemy placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Enemy kind name, looked up in [`Tuning::enemy_kinds`]
    pub kind: String,
    /// Top-left of the enemy's bounds
    pub pos: Vec2,
    /// Start facing left
    #[serde(default)]
    pub mirrored: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDesc {
    pub name: String,
    pub colliders: Vec<Rect>,
    pub player_spawn: Option<Vec2>,
    pub enemies: Vec<EnemySpawn>,
}

impl LevelDesc {
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn demo() -> Result<Self, SetupError> {
        Self::from_json(DEMO_LEVEL)
    }

    /// Check every fixture against the tuning table
    pub fn validate(&self, tuning: &Tuning) -> Result<Vec2, SetupError> {
        let spawn = match self.player_spawn {
            Some(p) if p.is_finite() => p,
            _ => return Err(SetupError::MissingPlayerSpawn),
        };

        if let Some((index, rect)) = self.colliders.iter().enumerate().find(|(_, r)| !r.is_valid()) {
            return Err(SetupError::InvalidCollider { index, rect: *rect });
        }

        tuning.validate()?;
        if let Some(spawn) = self.enemies.iter().find(|e| tuning.kind(&e.kind).is_none()) {
            return Err(SetupError::UnknownEnemyKind(spawn.kind.clone()));
        }

        Ok(spawn)
    }
}

impl World {
    /// Build a world from a level, failing on any bad fixture
    pub fn from_level(level: &LevelDesc, tuning: &Tuning, seed: u64) -> Result<World, SetupError> {
        let spawn = level.validate(tuning)?;

        let colliders = ColliderRegistry::new(level.colliders.iter().copied());
        let mut world = World::new(seed, colliders, spawn, tuning.player);
        for placement in &level.enemies {
            let kind = tuning
                .kind(&placement.kind)
                .cloned()
                .ok_or_else(|| SetupError::UnknownEnemyKind(placement.kind.clone()))?;
            world.spawn_enemy(kind, placement.pos, placement.mirrored);
        }

        log::info!(
            "loaded level '{}': {} colliders, {} enemies, seed {}",
            level.name,
            world.colliders().len(),
            world.enemies.len(),
            seed
        );
        Ok(world)
    }
}
