//! Game state and core simulation types
//!
//! Entities are plain rectangles plus behavioural fields. The session record
//! [`GameState`] owns every entity, the RNG and all counters.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation;
use super::rect::Rect;
use crate::{SimError, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, `start()` not called yet
    NotStarted,
    /// Active gameplay
    Running,
    /// Session ended; only `start()` leaves this phase
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Last life lost to an enemy bullet
    OutOfLives,
    /// An enemy reached the player's line
    FormationBreached,
}

/// Horizontal travel direction of the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepDirection {
    Left,
    #[default]
    Right,
}

impl SweepDirection {
    /// -1.0 for left, 1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            SweepDirection::Left => -1.0,
            SweepDirection::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SweepDirection::Left => SweepDirection::Right,
            SweepDirection::Right => SweepDirection::Left,
        }
    }
}

/// Something noteworthy that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player bullet was spawned (auto-fire or `fire()`)
    PlayerFired { auto: bool },
    EnemyDestroyed { points: u32, at: Vec2 },
    PlayerHit { lives_left: u8 },
    VolleyFired { shots: u32 },
    /// The formation hit a screen edge, reversed and dropped
    FormationDescended,
    LevelAdvanced { level: u32 },
    GameOver { reason: GameOverReason },
}

/// The player's ship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Intent flags, overwritten by input, read once per tick
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Player {
    /// Spawn with the top-left corner at `pos` and no movement intent
    pub fn spawn(pos: Vec2, size: Vec2) -> Self {
        Self {
            rect: Rect { pos, size },
            moving_left: false,
            moving_right: false,
        }
    }
}

/// A member of the formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    /// Score awarded when destroyed; fixed by formation row
    pub point_value: u32,
}

impl Enemy {
    pub fn new(rect: Rect, point_value: u32) -> Self {
        Self { rect, point_value }
    }
}

/// A projectile fired by the player or by an enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    /// Player bullets travel up, enemy bullets down
    pub from_player: bool,
    pub speed: f32,
}

impl Bullet {
    /// Player bullet whose top edge is centred on `muzzle`
    pub fn from_player(muzzle: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            rect: Rect::new(muzzle.x - size.x / 2.0, muzzle.y, size.x, size.y),
            from_player: true,
            speed,
        }
    }

    /// Enemy bullet whose top edge is centred on `muzzle`
    pub fn from_enemy(muzzle: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            from_player: false,
            ..Self::from_player(muzzle, size, speed)
        }
    }

    /// Advance one tick: up by `speed`, or down by half of it for enemy fire
    pub fn update(&mut self) {
        if self.from_player {
            self.rect.pos.y -= self.speed;
        } else {
            self.rect.pos.y += self.speed / 2.0;
        }
    }
}

/// A short-lived blast marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub rect: Rect,
    /// Ticks survived so far
    pub frame_count: u32,
}

impl Explosion {
    pub fn centered_on(center: Vec2, size: f32) -> Self {
        Self {
            rect: Rect::centered_at(center, Vec2::splat(size)),
            frame_count: 0,
        }
    }

    pub fn update(&mut self) {
        self.frame_count += 1;
    }
}

/// Read-only view of a session for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub tick: u64,
    pub player: Rect,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed applied on every `start()`
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Screen width and height
    pub screen: Vec2,
    pub score: u64,
    pub lives: u8,
    /// Current wave, 1-based
    pub level: u32,
    /// Ticks since the session started
    pub tick_counter: u64,
    /// Ticks since the last automatic shot
    pub auto_fire_counter: u32,
    pub enemy_direction: SweepDirection,
    pub player: Player,
    /// The formation, in spawn order
    pub enemies: Vec<Enemy>,
    /// Live bullets, in spawn order
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    /// Events of the last tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create an unstarted session with default tuning
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tuning: Tuning::default(),
            phase: GamePhase::NotStarted,
            screen: Vec2::ZERO,
            score: 0,
            lives: 0,
            level: 0,
            tick_counter: 0,
            auto_fire_counter: 0,
            enemy_direction: SweepDirection::Right,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create an unstarted session with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            ..Self::new(seed)
        })
    }

    /// Start (or restart) a session on a screen of the given size
    ///
    /// Valid from any phase. Resets every counter and collection, reseeds
    /// the RNG and spawns the first formation.
    pub fn start(&mut self, screen_width: f32, screen_height: f32) -> Result<(), SimError> {
        if !(screen_width.is_finite()
            && screen_height.is_finite()
            && screen_width > 0.0
            && screen_height > 0.0)
        {
            return Err(SimError::InvalidScreen {
                width: screen_width,
                height: screen_height,
            });
        }
        let min_width = self.tuning.min_screen_width();
        let min_height = self.tuning.min_screen_height();
        if screen_width < min_width || screen_height < min_height {
            return Err(SimError::ScreenTooSmall {
                width: screen_width,
                height: screen_height,
                min_width,
                min_height,
            });
        }

        self.screen = Vec2::new(screen_width, screen_height);
        self.player = Player::spawn(
            Vec2::new(
                screen_width / 2.0,
                screen_height * self.tuning.player_spawn_y_fraction,
            ),
            Vec2::new(self.tuning.player_width, self.tuning.player_height),
        );
        self.enemies.clear();
        self.bullets.clear();
        self.explosions.clear();
        self.events.clear();
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.level = 1;
        self.tick_counter = 0;
        self.auto_fire_counter = 0;
        self.enemy_direction = SweepDirection::Right;
        self.rng = Pcg32::seed_from_u64(self.seed);

        formation::spawn(self);
        self.phase = GamePhase::Running;

        log::info!(
            "Session started: screen={}x{}, seed={}, formation={} enemies",
            screen_width,
            screen_height,
            self.seed,
            self.enemies.len()
        );
        Ok(())
    }

    /// Set the move-left intent; enabling it clears move-right
    pub fn set_moving_left(&mut self, moving: bool) {
        self.player.moving_left = moving;
        if moving {
            self.player.moving_right = false;
        }
    }

    /// Set the move-right intent; enabling it clears move-left
    pub fn set_moving_right(&mut self, moving: bool) {
        self.player.moving_right = moving;
        if moving {
            self.player.moving_left = false;
        }
    }

    /// Fire a player bullet right away, independent of auto-fire
    ///
    /// Ignored unless the session is running.
    pub fn fire(&mut self) {
        if self.phase != GamePhase::Running {
            log::debug!("fire() ignored in phase {:?}", self.phase);
            return;
        }
        self.spawn_player_bullet(false);
    }

    /// Spawn a player bullet centred on the player's top edge
    pub(crate) fn spawn_player_bullet(&mut self, auto: bool) {
        let bullet = Bullet::from_player(
            self.player.rect.top_center(),
            Vec2::new(self.tuning.bullet_width, self.tuning.bullet_height),
            self.tuning.bullet_speed,
        );
        self.bullets.push(bullet);
        self.events.push(GameEvent::PlayerFired { auto });
    }

    /// Copy out everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level,
            tick: self.tick_counter,
            player: self.player.rect,
            enemies: self.enemies.clone(),
            bullets: self.bullets.clone(),
            explosions: self.explosions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_bullet_update_asymmetric_speed() {
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        let mut up = Bullet::from_player(Vec2::new(100.0, 500.0), size, 8.0);
        let mut down = Bullet::from_enemy(Vec2::new(100.0, 500.0), size, 8.0);
        up.update();
        down.update();
        assert_eq!(up.rect.y(), 492.0);
        assert_eq!(down.rect.y(), 504.0);
        assert!(up.from_player);
        assert!(!down.from_player);
    }

    #[test]
    fn test_bullet_centred_on_muzzle() {
        let b = Bullet::from_player(Vec2::new(100.0, 40.0), Vec2::new(3.0, 10.0), 8.0);
        assert_eq!(b.rect.x(), 98.5);
        assert_eq!(b.rect.y(), 40.0);
    }

    #[test]
    fn test_explosion_update() {
        let mut e = Explosion::centered_on(Vec2::new(50.0, 50.0), EXPLOSION_SIZE);
        assert_eq!(e.frame_count, 0);
        e.update();
        e.update();
        assert_eq!(e.frame_count, 2);
        assert_eq!(e.rect.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = GameState::new(7);
        state.start(400.0, 800.0).unwrap();
        state.score = 500;
        state.lives = 1;
        state.level = 4;
        state.tick_counter = 99;
        state.bullets.clear();
        state.fire();
        state.enemies.clear();
        state.phase = GamePhase::GameOver;

        state.start(400.0, 800.0).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.tick_counter, 0);
        assert_eq!(state.auto_fire_counter, 0);
        assert!(state.bullets.is_empty());
        assert!(state.explosions.is_empty());
        assert!(!state.enemies.is_empty());
        assert_eq!(state.player.rect.pos, Vec2::new(200.0, 680.0));
    }

    #[test]
    fn test_start_rejects_bad_screens() {
        let mut state = GameState::new(1);
        assert!(matches!(
            state.start(f32::NAN, 800.0),
            Err(SimError::InvalidScreen { .. })
        ));
        assert!(matches!(
            state.start(400.0, -1.0),
            Err(SimError::InvalidScreen { .. })
        ));
        assert!(matches!(
            state.start(100.0, 800.0),
            Err(SimError::ScreenTooSmall { .. })
        ));
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_movement_intents_are_exclusive() {
        let mut state = GameState::new(1);
        state.set_moving_left(true);
        assert!(state.player.moving_left);
        state.set_moving_right(true);
        assert!(state.player.moving_right);
        assert!(!state.player.moving_left);
        state.set_moving_right(false);
        assert!(!state.player.moving_right);
        assert!(!state.player.moving_left);
        // Disabling one direction leaves the other alone
        state.set_moving_left(true);
        state.set_moving_right(false);
        assert!(state.player.moving_left);
    }

    #[test]
    fn test_fire_before_start_is_ignored() {
        let mut state = GameState::new(1);
        state.fire();
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_fire_spawns_at_player_top_center() {
        let mut state = GameState::new(1);
        state.start(400.0, 800.0).unwrap();
        state.fire();
        assert_eq!(state.bullets.len(), 1);
        let p = state.player.rect;
        let b = &state.bullets[0];
        assert!(b.from_player);
        assert_eq!(b.rect.x(), p.x() + p.width() / 2.0 - 1.5);
        assert_eq!(b.rect.y(), p.y());
        assert_eq!(state.events, vec![GameEvent::PlayerFired { auto: false }]);
    }

    #[test]
    fn test_with_tuning_validates() {
        let tuning = Tuning {
            auto_fire_interval: 0,
            ..Tuning::default()
        };
        assert!(GameState::with_tuning(1, tuning).is_err());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(3);
        state.start(400.0, 800.0).unwrap();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Running);
        assert_eq!(back.enemies.len(), state.enemies.len());
    }
}
