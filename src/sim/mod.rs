//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod formation;
pub mod input;
pub mod movement;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::overlaps;
pub use formation::{FormationLayout, SweepOutcome};
pub use input::{InputLatch, SharedInput};
pub use rect::Rect;
pub use state::{
    Bullet, Enemy, Explosion, GameEvent, GameOverReason, GamePhase, GameState, Player, Snapshot,
    SweepDirection,
};
pub use tick::{TickOutcome, tick};
