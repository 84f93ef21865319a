//! Ember Rift - character simulation core for a 2D action platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, hit-scan, combat, enemy AI)
//! - `tuning`: Data-driven game balance
//! - `level`: Level description and world construction
//! - `error`: Setup errors (bad configuration is fatal)

pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::SetupError;
pub use level::{EnemySpawn, LevelDesc};
pub use tuning::{PlayerTuning, Tuning};

/// Simulation clock reading in seconds
pub type Timestamp = f64;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Upper bound on a single tick's delta, prevents large-step tunneling
    pub const MAX_DT: f32 = 0.1;

    /// Downward acceleration in scene units/s² (y grows downward)
    pub const GRAVITY: f32 = 1000.0;
    /// Traction multiplier while standing on ground
    pub const GROUND_TRACTION: f32 = 1.0;
    /// Traction multiplier while airborne (reduced air control)
    pub const AIR_TRACTION: f32 = 0.4;

    /// Default hit-scan march step in scene units
    pub const HIT_SCAN_STEP: f32 = 5.0;
    /// Longest weapon or attack range a tuning file may configure
    pub const MAX_SCAN_RANGE: f32 = 4096.0;

    /// Battle mode lasts this long after the last shot or hurt (seconds)
    pub const BATTLE_MODE_TIMEOUT: f32 = 2.0;
    /// Horizontal push-back per point of damage
    pub const PUSH_BACK_PER_DAMAGE: f32 = 5.0;
    /// Upward pop per point of damage
    pub const POP_UP_PER_DAMAGE: f32 = 0.5;
}

/// Seconds elapsed between `since` and `now`
#[inline]
pub fn elapsed(now: Timestamp, since: Timestamp) -> f32 {
    (now - since) as f32
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}
