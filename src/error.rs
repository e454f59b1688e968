//! Error taxonomy
//!
//! `SimError` covers per-frame subsystem failures. The frame loop catches them,
//! logs them and skips the failing subsystem for that frame. `LevelError`
//! covers content handed over by the level and dialogue collaborators.

use thiserror::Error;

use crate::sim::GameState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid timestep: {dt}")]
    InvalidTimestep { dt: f32 },
    #[error("entity {id} left the finite range after integration")]
    NonFiniteState { id: u32 },
    #[error("illegal state transition {from:?} -> {to:?}")]
    IllegalTransition { from: GameState, to: GameState },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("platform record {index} is malformed: {reason}")]
    MalformedPlatform { index: usize, reason: String },
    #[error("dialogue conversation `{conversation}` points at unknown node `{node}`")]
    DanglingEntry { conversation: String, node: String },
}
