//! Sky Sweep - a fixed-tick arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, formation, game state)
//! - `tuning`: Data-driven game balance
//! - `error`: Precondition and configuration errors
//!
//! Rendering and input capture live outside this crate. A presentation layer
//! reads [`sim::Snapshot`] and forwards intents (move-left, move-right, fire).

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical tick rate (the host drives one tick per period)
    pub const TICK_HZ: u32 = 60;
    /// Logical tick period in milliseconds
    pub const TICK_MILLIS: u64 = 1000 / TICK_HZ as u64;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    /// Horizontal displacement per tick per active intent
    pub const PLAYER_STEP: f32 = 5.0;
    /// Vertical spawn position as a fraction of screen height
    pub const PLAYER_SPAWN_Y_FRACTION: f32 = 0.85;
    pub const STARTING_LIVES: u8 = 3;
    /// Ticks between automatic player shots
    pub const AUTO_FIRE_INTERVAL: u32 = 20;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 3.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    /// Player bullets travel this far up per tick, enemy bullets half of it down
    pub const BULLET_SPEED: f32 = 8.0;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 20.0;

    /// Formation layout
    pub const FORMATION_ROWS: u32 = 4;
    pub const FORMATION_MIN_COLS: u32 = 8;
    pub const FORMATION_NOMINAL_SPACING: f32 = 50.0;
    pub const FORMATION_ROW_SPACING: f32 = 40.0;
    pub const FORMATION_TOP: f32 = 50.0;
    /// Share of the screen width the formation may occupy
    pub const FORMATION_FILL: f32 = 0.9;
    /// Score per row, counted from the front row
    pub const POINTS_PER_ROW: u32 = 10;

    /// Formation movement
    pub const SWEEP_BASE_INTERVAL: u32 = 20;
    pub const SWEEP_SPEEDUP_PER_LEVEL: u32 = 2;
    /// Cap on the level speed-up; keeps the sweep interval at 5 ticks or more
    pub const SWEEP_MAX_SPEEDUP: u32 = 15;
    pub const SWEEP_STEP: f32 = 5.0;
    pub const DESCENT_STEP: f32 = 10.0;

    /// Enemy fire
    pub const VOLLEY_INTERVAL: u32 = 60;
    pub const MAX_VOLLEY_SHOTS: u32 = 3;

    /// Explosions
    pub const EXPLOSION_SIZE: f32 = 30.0;
    pub const EXPLOSION_LIFETIME: u32 = 20;
}
