use thiserror::Error;

use crate::api::types::{GridCoord, StageKey};

/// Errors surfaced by the engine. All of them are configuration errors:
/// gameplay conditions (death, repeated hazard contact) are handled as state transitions.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A reachable grid cell has no registered stage.
    #[error("no stage registered at grid location {grid}")]
    StageNotFound { grid: GridCoord },

    #[error("unknown stage key {0}")]
    UnknownStage(StageKey),

    #[error("grid location {grid} is used by both stage {existing} and stage {incoming}")]
    DuplicateGridLocation {
        grid: GridCoord,
        existing: StageKey,
        incoming: StageKey,
    },

    #[error("stage key {0} registered twice")]
    DuplicateStageKey(StageKey),

    #[error("invalid rectangle dimensions {width}x{height}: both must be finite and > 0")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("non-finite position ({x}, {y})")]
    NonFinitePosition { x: f32, y: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed level data: {0}")]
    Manifest(#[from] serde_json::Error),
}
