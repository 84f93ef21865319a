//! World state: clock, RNG, role registries and level geometry
//!
//! Everything the tick needs lives here. Players and enemies are kept in
//! separate collections so target sets come from plain queries rather than a
//! scan over every node.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Actor, ActorId, Role};
use super::ai::{EnemyAi, EnemyKind};
use super::collider::ColliderRegistry;
use super::feedback::{AnimTag, Feedback};
use super::hitscan::Target;
use crate::Timestamp;
use crate::tuning::PlayerTuning;

/// An enemy actor with its controller and type record
#[derive(Debug, Clone)]
pub struct Enemy {
    pub actor: Actor,
    pub ai: EnemyAi,
    pub kind: EnemyKind,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Monotonic simulation clock (seconds)
    pub(crate) now: Timestamp,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) colliders: ColliderRegistry,
    pub player: Actor,
    /// Active enemies, in spawn (and therefore id) order
    pub enemies: Vec<Enemy>,
    pub player_spawn: Vec2,
    pub player_tuning: PlayerTuning,
    next_id: ActorId,
}

impl World {
    /// Create a world with a freshly spawned player and no enemies
    pub fn new(seed: u64, colliders: ColliderRegistry, player_spawn: Vec2, player_tuning: PlayerTuning) -> Self {
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            now: 0.0,
            time_ticks: 0,
            colliders,
            player: player_tuning.spawn(0, player_spawn),
            enemies: Vec::new(),
            player_spawn,
            player_tuning,
            next_id: 0,
        };
        world.player.id = world.next_actor_id();
        world
    }

    /// Allocate a new actor ID
    pub fn next_actor_id(&mut self) -> ActorId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub(crate) fn advance_clock(&mut self, dt: f32) {
        self.now += dt as f64;
        self.time_ticks += 1;
    }

    pub fn colliders(&self) -> &ColliderRegistry {
        &self.colliders
    }

    /// Spawn an enemy of `kind` with its bounds' top-left at `pos`
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2, mirrored: bool) -> ActorId {
        let id = self.next_actor_id();
        let mut actor = Actor::new(id, Role::Enemy, pos, kind.size, kind.body, kind.hitpoints);
        actor.head_offset = kind.head_offset;
        actor.mirrored = mirrored;
        let ai = EnemyAi::new(pos, self.now);
        log::debug!("spawned {} #{} at {:?}", kind.name, id, pos);
        self.enemies.push(Enemy { actor, ai, kind });
        id
    }

    /// Replace the player with a fresh one at the spawn point
    pub fn respawn_player(&mut self, fx: &mut dyn Feedback) -> ActorId {
        let id = self.next_actor_id();
        self.player = self.player_tuning.spawn(id, self.player_spawn);
        fx.set_tag(id, AnimTag::Idle);
        log::info!("player respawned as #{} at {:?}", id, self.player_spawn);
        id
    }

    pub fn enemy(&self, id: ActorId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.actor.id == id)
    }

    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.actor.id == id)
    }

    /// All live actors of a role
    pub fn live_actors(&self, role: Role) -> Vec<&Actor> {
        match role {
            Role::Player => std::iter::once(&self.player).filter(|a| a.is_alive()).collect(),
            Role::Enemy => self
                .enemies
                .iter()
                .map(|e| &e.actor)
                .filter(|a| a.is_alive())
                .collect(),
        }
    }

    /// Hit-scan targets for an actor of `role`: its live opponents
    pub fn opponents_of(&self, role: Role) -> Vec<Target> {
        self.live_actors(role.opponent())
            .into_iter()
            .map(|a| Target {
                id: a.id,
                bounds: a.bounds(),
            })
            .collect()
    }
}
