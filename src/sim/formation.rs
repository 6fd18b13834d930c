//! Enemy formation: layout, lateral sweep, descent, volleys and wave refill
//!
//! All cadences are keyed off `GameState::tick_counter`, so the caller must
//! bump the counter before invoking the per-tick steps here.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{Bullet, Enemy, GameEvent, GameState, SweepDirection};
use crate::Tuning;

/// Column count and spacing of a formation for a given screen width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationLayout {
    pub rows: u32,
    pub cols: u32,
    /// Horizontal distance between neighbouring enemies
    pub spacing: f32,
    /// Left edge of the first column's cell
    pub left: f32,
}

impl FormationLayout {
    /// Widest layout that fits `formation_fill` of the screen
    ///
    /// Columns grow with width but never drop below `formation_min_cols`;
    /// spacing is the nominal spacing unless that would overflow the fill
    /// width. The block of cells is centred horizontally.
    pub fn for_width(tuning: &Tuning, screen_width: f32) -> Self {
        let usable = screen_width * tuning.formation_fill;
        let cols = ((usable / tuning.formation_nominal_spacing).floor() as u32)
            .max(tuning.formation_min_cols);
        let spacing = tuning.formation_nominal_spacing.min(usable / cols as f32);
        let left = (screen_width - cols as f32 * spacing) / 2.0;
        Self {
            rows: tuning.formation_rows,
            cols,
            spacing,
            left,
        }
    }
}

/// What the sweep step did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Not a sweep tick
    Idle,
    /// Shifted sideways
    Shifted,
    /// Shifted, hit an edge, reversed and dropped
    Descended,
}

/// Lay out a fresh formation at the base position
///
/// Row 0 is the top (furthest from the player) and is worth the most.
pub fn spawn(state: &mut GameState) {
    let tuning = &state.tuning;
    let layout = FormationLayout::for_width(tuning, state.screen.x);
    let inset = (layout.spacing - tuning.enemy_width) / 2.0;

    state.enemies.clear();
    state
        .enemies
        .reserve((layout.rows * layout.cols) as usize);
    for row in 0..layout.rows {
        let y = tuning.formation_top + row as f32 * tuning.formation_row_spacing;
        let point_value = (layout.rows - row) * tuning.points_per_row;
        for col in 0..layout.cols {
            let x = layout.left + col as f32 * layout.spacing + inset;
            state.enemies.push(Enemy::new(
                Rect::new(x, y, tuning.enemy_width, tuning.enemy_height),
                point_value,
            ));
        }
    }
}

/// Sweep the formation sideways on its level-dependent cadence
///
/// When the leading edge would cross the screen boundary on the next step,
/// the whole formation drops and the direction flips for the next sweep.
pub fn sweep(state: &mut GameState) -> SweepOutcome {
    let interval = u64::from(state.tuning.sweep_interval(state.level));
    if state.tick_counter % interval != 0 || state.enemies.is_empty() {
        return SweepOutcome::Idle;
    }

    let step = state.tuning.sweep_step;
    let direction = state.enemy_direction;
    let shift = Vec2::new(step * direction.sign(), 0.0);
    for enemy in &mut state.enemies {
        enemy.rect.translate(shift);
    }

    let screen_width = state.screen.x;
    let at_edge = match direction {
        SweepDirection::Right => state
            .enemies
            .iter()
            .any(|e| e.rect.right() + step > screen_width),
        SweepDirection::Left => state.enemies.iter().any(|e| e.rect.x() - step < 0.0),
    };
    if !at_edge {
        return SweepOutcome::Shifted;
    }

    state.enemy_direction = direction.reversed();
    let drop = Vec2::new(0.0, state.tuning.descent_step);
    for enemy in &mut state.enemies {
        enemy.rect.translate(drop);
    }
    state.events.push(GameEvent::FormationDescended);
    SweepOutcome::Descended
}

/// Fire a volley on the volley cadence
///
/// Shooters are drawn uniformly with replacement, so one enemy may fire more
/// than once in the same volley. Returns the number of bullets spawned.
pub fn volley(state: &mut GameState) -> u32 {
    if state.tick_counter % u64::from(state.tuning.volley_interval) != 0
        || state.enemies.is_empty()
    {
        return 0;
    }

    let shots = state.tuning.volley_shots(state.level);
    let size = Vec2::new(state.tuning.bullet_width, state.tuning.bullet_height);
    for _ in 0..shots {
        let shooter = state.rng.random_range(0..state.enemies.len());
        let muzzle = state.enemies[shooter].rect.bottom_center();
        state
            .bullets
            .push(Bullet::from_enemy(muzzle, size, state.tuning.bullet_speed));
    }

    log::debug!(
        "Volley of {} at tick {} ({} enemies left)",
        shots,
        state.tick_counter,
        state.enemies.len()
    );
    state.events.push(GameEvent::VolleyFired { shots });
    shots
}

/// Move to the next level once the formation is cleared
///
/// Returns true if the level advanced.
pub fn advance_level(state: &mut GameState) -> bool {
    if !state.enemies.is_empty() {
        return false;
    }

    state.level += 1;
    state.enemy_direction = SweepDirection::Right;
    spawn(state);
    log::info!(
        "Level {} (score {}, sweep every {} ticks)",
        state.level,
        state.score,
        state.tuning.sweep_interval(state.level)
    );
    state.events.push(GameEvent::LevelAdvanced { level: state.level });
    true
}
