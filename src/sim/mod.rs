//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep, caller-supplied clock
//! - Seeded RNG only
//! - Stable iteration order (by actor ID)
//! - No rendering or audio dependencies; cues go out through [`Feedback`]

pub mod actor;
pub mod ai;
pub mod body;
pub mod collider;
pub mod combat;
pub mod feedback;
pub mod hitscan;
pub mod rect;
pub mod tick;
pub mod world;

pub use actor::{Actor, ActorId, Role};
pub use ai::{AiContext, AiState, AlertMark, AlertSource, EnemyAi, EnemyKind, PlayerView, Strike, WanderPhase};
pub use body::{BodyStep, BodyTuning, Direction, KinematicBody};
pub use collider::{ColliderId, ColliderRegistry, StaticCollider};
pub use combat::{BattleMode, Weapon};
pub use feedback::{AnimTag, EventLog, Feedback, GameEvent, NullFeedback, SoundEffect};
pub use hitscan::{Hit, ScanHit, Target, cast, cast_default};
pub use rect::Rect;
pub use tick::{ShotReport, TickInput, TickSummary, tick};
pub use world::{Enemy, World};
