//! Setup errors
//!
//! Only world construction can fail. Once a world exists every tick is
//! infallible.

use thiserror::Error;

use crate::sim::Rect;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("level has no player spawn point")]
    MissingPlayerSpawn,
    #[error("unknown enemy kind `{0}`")]
    UnknownEnemyKind(String),
    #[error("collider {index} has a non-finite or negative extent: {rect:?}")]
    InvalidCollider { index: usize, rect: Rect },
    #[error("enemy kind `{0}` is defined more than once")]
    DuplicateEnemyKind(String),
    #[error("{owner} has range {range}, expected a value in (0, {}]", crate::consts::MAX_SCAN_RANGE)]
    InvalidRange { owner: String, range: f32 },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
