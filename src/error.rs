//! Errors reported to callers of the simulation
//!
//! Gameplay itself has no failure states: running out of lives or letting the
//! formation through is `GamePhase::GameOver`, not an error. These cover
//! precondition violations and bad configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// `tick()` was called before the first `start()`
    #[error("simulation has not been started")]
    NotStarted,

    #[error("screen dimensions must be finite and positive, got {width}x{height}")]
    InvalidScreen { width: f32, height: f32 },

    #[error(
        "screen {width}x{height} is too small for the formation, need at least {min_width}x{min_height}"
    )]
    ScreenTooSmall {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
