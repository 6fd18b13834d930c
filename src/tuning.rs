//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::*;

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal displacement per tick per active intent
    pub player_step: f32,
    /// Spawn height as a fraction of the screen height
    pub player_spawn_y_fraction: f32,
    pub starting_lives: u8,
    /// Ticks between automatic shots
    pub auto_fire_interval: u32,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Player bullets move up by this much per tick, enemy bullets down by half
    pub bullet_speed: f32,

    // === Formation ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub formation_rows: u32,
    pub formation_min_cols: u32,
    pub formation_nominal_spacing: f32,
    pub formation_row_spacing: f32,
    pub formation_top: f32,
    /// Share of the screen width the formation may occupy, in (0, 1)
    pub formation_fill: f32,
    pub points_per_row: u32,

    // === Sweep ===
    pub sweep_base_interval: u32,
    pub sweep_speedup_per_level: u32,
    pub sweep_max_speedup: u32,
    pub sweep_step: f32,
    pub descent_step: f32,

    // === Enemy fire ===
    pub volley_interval: u32,
    pub max_volley_shots: u32,

    // === Explosions ===
    pub explosion_size: f32,
    pub explosion_lifetime: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_step: PLAYER_STEP,
            player_spawn_y_fraction: PLAYER_SPAWN_Y_FRACTION,
            starting_lives: STARTING_LIVES,
            auto_fire_interval: AUTO_FIRE_INTERVAL,

            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            bullet_speed: BULLET_SPEED,

            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            formation_rows: FORMATION_ROWS,
            formation_min_cols: FORMATION_MIN_COLS,
            formation_nominal_spacing: FORMATION_NOMINAL_SPACING,
            formation_row_spacing: FORMATION_ROW_SPACING,
            formation_top: FORMATION_TOP,
            formation_fill: FORMATION_FILL,
            points_per_row: POINTS_PER_ROW,

            sweep_base_interval: SWEEP_BASE_INTERVAL,
            sweep_speedup_per_level: SWEEP_SPEEDUP_PER_LEVEL,
            sweep_max_speedup: SWEEP_MAX_SPEEDUP,
            sweep_step: SWEEP_STEP,
            descent_step: DESCENT_STEP,

            volley_interval: VOLLEY_INTERVAL,
            max_volley_shots: MAX_VOLLEY_SHOTS,

            explosion_size: EXPLOSION_SIZE,
            explosion_lifetime: EXPLOSION_LIFETIME,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Ticks between formation sweeps at the given level
    ///
    /// Shrinks with level and bottoms out at
    /// `sweep_base_interval - sweep_max_speedup`.
    pub fn sweep_interval(&self, level: u32) -> u32 {
        let speedup = level
            .saturating_mul(self.sweep_speedup_per_level)
            .min(self.sweep_max_speedup);
        self.sweep_base_interval - speedup
    }

    /// Enemy bullets per volley at the given level
    pub fn volley_shots(&self, level: u32) -> u32 {
        level.min(self.max_volley_shots)
    }

    /// Narrowest screen on which the minimum formation, the player and the
    /// first sweep step all fit
    pub fn min_screen_width(&self) -> f32 {
        let formation = self.formation_min_cols as f32 * self.enemy_width / self.formation_fill;
        let sweep_room = 2.0 * self.sweep_step / (1.0 - self.formation_fill);
        let player = 2.0 * self.player_width;
        formation.max(sweep_room).max(player)
    }

    /// Shortest screen on which the player sits fully on screen and below
    /// the freshly spawned formation
    pub fn min_screen_height(&self) -> f32 {
        let formation_bottom = self.formation_top
            + self.formation_rows.saturating_sub(1) as f32 * self.formation_row_spacing
            + self.enemy_height;
        let below_formation = formation_bottom / self.player_spawn_y_fraction;
        let player_on_screen = self.player_height / (1.0 - self.player_spawn_y_fraction);
        below_formation.max(player_on_screen)
    }

    /// Reject values that would stall a cadence, divide by zero, or make
    /// entities degenerate
    pub fn validate(&self) -> Result<(), SimError> {
        let sizes = [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("explosion_size", self.explosion_size),
            ("formation_nominal_spacing", self.formation_nominal_spacing),
            ("formation_row_spacing", self.formation_row_spacing),
            ("bullet_speed", self.bullet_speed),
            ("player_step", self.player_step),
            ("sweep_step", self.sweep_step),
            ("descent_step", self.descent_step),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.formation_top.is_finite() && self.formation_top >= 0.0) {
            return Err(invalid(format!(
                "formation_top must be non-negative, got {}",
                self.formation_top
            )));
        }

        let fractions = [
            ("formation_fill", self.formation_fill),
            ("player_spawn_y_fraction", self.player_spawn_y_fraction),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value < 1.0) {
                return Err(invalid(format!("{name} must be in (0, 1), got {value}")));
            }
        }

        let counts = [
            ("auto_fire_interval", self.auto_fire_interval),
            ("volley_interval", self.volley_interval),
            ("formation_rows", self.formation_rows),
            ("formation_min_cols", self.formation_min_cols),
            ("explosion_lifetime", self.explosion_lifetime),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(invalid(format!("{name} must be at least 1")));
            }
        }
        if self.starting_lives == 0 {
            return Err(invalid("starting_lives must be at least 1".to_string()));
        }
        if self.sweep_max_speedup >= self.sweep_base_interval {
            return Err(invalid(format!(
                "sweep_max_speedup ({}) must be below sweep_base_interval ({})",
                self.sweep_max_speedup, self.sweep_base_interval
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> SimError {
    log::warn!("Rejected tuning: {}", reason);
    SimError::InvalidTuning(reason)
}
