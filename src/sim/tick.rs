//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one logical frame. Step order
//! is observable (a wave clear and a breach in the same tick end the game)
//! and must not be rearranged.

use serde::{Deserialize, Serialize};

use super::collision::overlaps;
use super::formation;
use super::movement;
use super::state::{Explosion, GameEvent, GameOverReason, GamePhase, GameState};
use crate::SimError;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Still running, same level
    Continue,
    /// Formation cleared; a new one spawned at `level`
    LevelComplete { level: u32 },
    /// This tick ended the session
    GameOver { reason: GameOverReason },
    /// Session already over; nothing was touched
    Halted,
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState) -> Result<TickOutcome, SimError> {
    match state.phase {
        GamePhase::NotStarted => return Err(SimError::NotStarted),
        GamePhase::GameOver => return Ok(TickOutcome::Halted),
        GamePhase::Running => {}
    }

    state.events.clear();

    // 1. Counters
    state.tick_counter += 1;
    state.auto_fire_counter += 1;

    // 2. Auto-fire
    if state.auto_fire_counter >= state.tuning.auto_fire_interval {
        state.spawn_player_bullet(true);
        state.auto_fire_counter = 0;
    }

    // 3. Player movement
    movement::move_player(&mut state.player, state.tuning.player_step, state.screen.x);

    // 4. Bullets: travel, culling, hits
    let existing_explosions = state.explosions.len();
    if let Some(reason) = resolve_bullets(state) {
        return Ok(end_session(state, reason));
    }

    // 5. Explosions spawned in step 4 start aging next tick
    movement::age_explosions(
        &mut state.explosions,
        existing_explosions,
        state.tuning.explosion_lifetime,
    );

    // 6. Formation sweep
    formation::sweep(state);

    // 7. Enemy volley
    formation::volley(state);

    // 8. Wave clear
    let advanced = formation::advance_level(state);

    // 9. Breach check, overrides a wave clear from step 8
    let player_top = state.player.rect.y();
    if state.enemies.iter().any(|e| e.rect.bottom() > player_top) {
        return Ok(end_session(state, GameOverReason::FormationBreached));
    }

    Ok(if advanced {
        TickOutcome::LevelComplete { level: state.level }
    } else {
        TickOutcome::Continue
    })
}

/// Move every bullet, cull those off screen and resolve hits in spawn order
///
/// A player bullet destroys at most the first enemy it overlaps. Returns the
/// game-over reason if the player lost the last life; remaining bullets are
/// left untouched in that case.
fn resolve_bullets(state: &mut GameState) -> Option<GameOverReason> {
    let screen = state.screen;
    let explosion_size = state.tuning.explosion_size;

    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &mut state.bullets[i];
        bullet.update();
        if movement::is_off_screen(bullet, screen.y) {
            state.bullets.remove(i);
            continue;
        }
        let rect = bullet.rect;

        if bullet.from_player {
            if let Some(hit) = state.enemies.iter().position(|e| overlaps(&rect, &e.rect)) {
                let enemy = state.enemies.remove(hit);
                let center = enemy.rect.center();
                state.score += u64::from(enemy.point_value);
                state
                    .explosions
                    .push(Explosion::centered_on(center, explosion_size));
                state.events.push(GameEvent::EnemyDestroyed {
                    points: enemy.point_value,
                    at: center,
                });
                state.bullets.remove(i);
                continue;
            }
        } else if overlaps(&rect, &state.player.rect) {
            state.explosions.push(Explosion::centered_on(
                state.player.rect.center(),
                explosion_size,
            ));
            state.bullets.remove(i);
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::PlayerHit {
                lives_left: state.lives,
            });
            log::debug!("Player hit at tick {}, {} lives left", state.tick_counter, state.lives);
            if state.lives == 0 {
                return Some(GameOverReason::OutOfLives);
            }
            state.player.rect.pos.x = screen.x / 2.0;
            continue;
        }

        i += 1;
    }
    None
}

fn end_session(state: &mut GameState, reason: GameOverReason) -> TickOutcome {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { reason });
    log::info!(
        "Game over ({:?}) at tick {}: score {}, level {}",
        reason,
        state.tick_counter,
        state.score,
        state.level
    );
    TickOutcome::GameOver { reason }
}

impl GameState {
    /// Advance one logical frame; see [`tick`]
    pub fn tick(&mut self) -> Result<TickOutcome, SimError> {
        tick(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Bullet, SweepDirection};
    use glam::Vec2;
    use proptest::prelude::*;

    fn started() -> GameState {
        let mut state = GameState::new(12345);
        state.start(400.0, 800.0).unwrap();
        state
    }

    fn player_bullets(state: &GameState) -> usize {
        state.bullets.iter().filter(|b| b.from_player).count()
    }

    #[test]
    fn test_tick_before_start_is_rejected() {
        let mut state = GameState::new(1);
        assert!(matches!(state.tick(), Err(SimError::NotStarted)));
        assert_eq!(state.tick_counter, 0);
    }

    #[test]
    fn test_start_scenario_layout() {
        let state = started();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.enemies.len() % 4, 0);
        assert!(state.enemies.len() >= 4 * 8);
        for e in &state.enemies {
            assert!(e.rect.x() >= 0.0 && e.rect.right() <= 400.0);
        }
    }

    #[test]
    fn test_auto_fire_every_twenty_ticks() {
        let mut state = started();
        state.fire();
        assert_eq!(player_bullets(&state), 1);

        for _ in 0..19 {
            assert_eq!(state.tick().unwrap(), TickOutcome::Continue);
        }
        assert_eq!(player_bullets(&state), 1);

        state.tick().unwrap();
        assert_eq!(player_bullets(&state), 2);
        assert_eq!(state.auto_fire_counter, 0);
        assert!(state.events.contains(&GameEvent::PlayerFired { auto: true }));
    }

    #[test]
    fn test_player_bullet_destroys_enemy() {
        let mut state = started();
        let target = state.enemies.last().unwrap().clone();
        let count = state.enemies.len();
        state.bullets.push(Bullet {
            rect: target.rect,
            from_player: true,
            speed: BULLET_SPEED,
        });

        state.tick().unwrap();
        assert_eq!(state.enemies.len(), count - 1);
        assert!(!state.enemies.contains(&target));
        assert_eq!(state.score, u64::from(target.point_value));
        assert!(state.bullets.is_empty());
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].rect.center(), target.rect.center());
    }

    #[test]
    fn test_bullet_destroys_at_most_one_enemy() {
        let mut state = started();
        let rect = state.enemies[0].rect;
        state.enemies.truncate(1);
        state.enemies.push(state.enemies[0].clone());
        state.enemies[1].point_value = 99;
        state.bullets.push(Bullet {
            rect,
            from_player: true,
            speed: BULLET_SPEED,
        });

        state.tick().unwrap();
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].point_value, 99);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_enemy_bullet_hit_recenters_player() {
        let mut state = started();
        state.player.rect.pos.x = 20.0;
        let hit_center = state.player.rect.center();
        state.bullets.push(Bullet {
            rect: state.player.rect,
            from_player: false,
            speed: BULLET_SPEED,
        });

        assert_eq!(state.tick().unwrap(), TickOutcome::Continue);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.player.rect.x(), 200.0);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].rect.center(), hit_center);
        assert!(state.events.contains(&GameEvent::PlayerHit {
            lives_left: STARTING_LIVES - 1
        }));
    }

    #[test]
    fn test_last_life_ends_game_immediately() {
        let mut state = started();
        state.lives = 1;
        state.bullets.push(Bullet {
            rect: state.player.rect,
            from_player: false,
            speed: BULLET_SPEED,
        });
        // Queued behind the fatal shot; must not be processed
        let target = state.enemies[0].clone();
        state.bullets.push(Bullet {
            rect: target.rect,
            from_player: true,
            speed: BULLET_SPEED,
        });

        let outcome = state.tick().unwrap();
        assert_eq!(
            outcome,
            TickOutcome::GameOver {
                reason: GameOverReason::OutOfLives
            }
        );
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.enemies.contains(&target));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut state = started();
        state.lives = 1;
        state.bullets.push(Bullet {
            rect: state.player.rect,
            from_player: false,
            speed: BULLET_SPEED,
        });
        state.tick().unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);

        let frozen = state.snapshot();
        state.set_moving_left(true);
        state.fire();
        for _ in 0..100 {
            assert_eq!(state.tick().unwrap(), TickOutcome::Halted);
        }
        assert_eq!(state.snapshot(), frozen);

        state.start(400.0, 800.0).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_off_screen_bullets_culled() {
        let mut state = started();
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        state
            .bullets
            .push(Bullet::from_player(Vec2::new(5.0, -5.0), size, BULLET_SPEED));
        state
            .bullets
            .push(Bullet::from_enemy(Vec2::new(5.0, 805.0), size, BULLET_SPEED));
        state.tick().unwrap();
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_explosion_lifetime() {
        let mut state = started();
        state
            .explosions
            .push(Explosion::centered_on(Vec2::new(10.0, 400.0), EXPLOSION_SIZE));
        for _ in 0..EXPLOSION_LIFETIME - 1 {
            state.tick().unwrap();
        }
        assert_eq!(state.explosions.len(), 1);
        state.tick().unwrap();
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_kill_explosion_lasts_twenty_ticks() {
        let mut state = started();
        let target = state.enemies.last().unwrap().clone();
        state.bullets.push(Bullet {
            rect: target.rect,
            from_player: true,
            speed: BULLET_SPEED,
        });
        let center = target.rect.center();
        let present = |state: &GameState| {
            state.explosions.iter().any(|e| e.rect.center() == center)
        };

        // Tick T creates the explosion
        state.tick().unwrap();
        assert!(present(&state));
        assert_eq!(state.explosions[0].frame_count, 0);

        for _ in 0..EXPLOSION_LIFETIME - 1 {
            state.tick().unwrap();
        }
        assert!(present(&state));

        state.tick().unwrap();
        assert!(!present(&state));
    }

    #[test]
    fn test_wave_clear_advances_level() {
        let mut state = started();
        state.enemies.clear();
        state.enemy_direction = SweepDirection::Left;
        let outcome = state.tick().unwrap();
        assert_eq!(outcome, TickOutcome::LevelComplete { level: 2 });
        assert_eq!(state.level, 2);
        assert!(!state.enemies.is_empty());
        assert_eq!(state.enemy_direction, SweepDirection::Right);
    }

    #[test]
    fn test_breach_overrides_wave_clear() {
        let mut state = started();
        state.enemies.clear();
        // Player line above the fresh formation's lower rows
        state.player.rect.pos.y = 100.0;
        let outcome = state.tick().unwrap();
        assert_eq!(
            outcome,
            TickOutcome::GameOver {
                reason: GameOverReason::FormationBreached
            }
        );
        assert_eq!(state.level, 2);
        assert!(state.events.contains(&GameEvent::LevelAdvanced { level: 2 }));
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_formation_reaching_player_ends_game() {
        let mut state = started();
        let player_top = state.player.rect.y();
        state.enemies[0].rect.pos.y = player_top - ENEMY_HEIGHT + 1.0;
        assert_eq!(
            state.tick().unwrap(),
            TickOutcome::GameOver {
                reason: GameOverReason::FormationBreached
            }
        );
    }

    #[test]
    fn test_formation_sweeps_on_cadence() {
        let mut state = started();
        let x = state.enemies[0].rect.x();
        for _ in 0..17 {
            state.tick().unwrap();
        }
        assert_eq!(state.enemies[0].rect.x(), x);
        state.tick().unwrap();
        assert_eq!(state.enemies[0].rect.x(), x + SWEEP_STEP);
    }

    #[test]
    fn test_first_volley_at_sixty_ticks() {
        let mut state = started();
        for _ in 0..59 {
            state.tick().unwrap();
        }
        assert!(state.bullets.iter().all(|b| b.from_player));
        state.tick().unwrap();
        assert_eq!(state.bullets.iter().filter(|b| !b.from_player).count(), 1);
        assert!(state.events.contains(&GameEvent::VolleyFired { shots: 1 }));
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = started();
        let mut b = started();
        for i in 0..2000u32 {
            let left = (i / 37) % 2 == 0;
            for state in [&mut a, &mut b] {
                state.set_moving_left(left);
                state.set_moving_right(!left);
                if i % 7 == 0 {
                    state.fire();
                }
                state.tick().unwrap();
            }
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_score_monotonic_and_player_in_bounds(
            seed in any::<u64>(),
            intents in proptest::collection::vec(0u8..6, 1..1500),
        ) {
            let mut state = GameState::new(seed);
            state.start(400.0, 800.0).unwrap();
            let mut last_score = 0;
            for intent in intents {
                match intent {
                    0 => state.set_moving_left(true),
                    1 => state.set_moving_right(true),
                    2 => {
                        state.set_moving_left(false);
                        state.set_moving_right(false);
                    }
                    3 => state.fire(),
                    _ => {}
                }
                state.tick().unwrap();
                prop_assert!(state.score >= last_score);
                last_score = state.score;
                let p = state.player.rect;
                prop_assert!(p.x() >= 0.0 && p.x() <= 400.0 - p.width());
            }
        }
    }
}
