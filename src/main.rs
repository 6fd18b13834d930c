//! Sky Sweep entry point
//!
//! Headless runner: plays one session with a simple autopilot feeding
//! intents through the input latch, optionally paced at the logical tick
//! rate, and reports the result.

use std::time::{Duration, Instant};

use sky_sweep::consts::TICK_MILLIS;
use sky_sweep::sim::{GameEvent, GameState, SharedInput, Snapshot, TickOutcome};
use sky_sweep::{SimError, Tuning};

const USAGE: &str = "usage: sky-sweep [--seed N] [--ticks N] [--width W] [--height H] \
                     [--tuning FILE] [--realtime] [--json]";

#[derive(Debug)]
struct Options {
    seed: u64,
    ticks: u64,
    width: f32,
    height: f32,
    tuning: Option<String>,
    realtime: bool,
    json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 1,
            ticks: 60 * 60 * 5,
            width: 400.0,
            height: 800.0,
            tuning: None,
            realtime: false,
            json: false,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match flag.as_str() {
            "--seed" => options.seed = parse(&flag, value()?)?,
            "--ticks" => options.ticks = parse(&flag, value()?)?,
            "--width" => options.width = parse(&flag, value()?)?,
            "--height" => options.height = parse(&flag, value()?)?,
            "--tuning" => options.tuning = Some(value()?),
            "--realtime" => options.realtime = true,
            "--json" => options.json = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn parse<T: std::str::FromStr>(flag: &str, raw: String) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{flag}: cannot parse {raw:?}"))
}

/// Steer under the lowest enemy and shoot when lined up
fn autopilot(state: &GameState, input: &SharedInput) {
    let player = state.player.rect;
    let target = state.enemies.iter().max_by(|a, b| {
        a.rect
            .bottom()
            .partial_cmp(&b.rect.bottom())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let Some(target) = target else {
        input.set_moving_left(false);
        input.set_moving_right(false);
        return;
    };

    let dx = target.rect.center().x - player.center().x;
    let tolerance = target.rect.width() / 2.0;
    if dx < -tolerance {
        input.set_moving_left(true);
    } else if dx > tolerance {
        input.set_moving_right(true);
    } else {
        input.set_moving_left(false);
        input.set_moving_right(false);
        if state.tick_counter % 8 == 0 {
            input.fire();
        }
    }
}

fn run(options: &Options) -> Result<Snapshot, SimError> {
    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut state = GameState::with_tuning(options.seed, tuning)?;
    state.start(options.width, options.height)?;

    let input = SharedInput::new();
    let period = Duration::from_millis(TICK_MILLIS);
    let mut deadline = Instant::now();

    for _ in 0..options.ticks {
        autopilot(&state, &input);
        if let Some(latch) = input.try_take() {
            state.apply_input(&latch);
        }

        let outcome = state.tick()?;
        for event in &state.events {
            match event {
                GameEvent::PlayerHit { lives_left } => {
                    log::info!("Hit! {} lives left", lives_left);
                }
                GameEvent::EnemyDestroyed { points, .. } => {
                    log::trace!("Enemy destroyed (+{})", points);
                }
                _ => {}
            }
        }
        match outcome {
            TickOutcome::LevelComplete { level } => {
                log::info!("Wave cleared, now on level {}", level);
            }
            TickOutcome::GameOver { .. } | TickOutcome::Halted => break,
            TickOutcome::Continue => {}
        }

        if options.realtime {
            deadline += period;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
        }
    }

    Ok(state.snapshot())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            std::process::exit(2);
        }
    };
    log::info!("Sky Sweep (headless) starting: {:?}", options);

    let snapshot = match run(&options) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    if options.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                log::error!("{}", SimError::from(err));
                std::process::exit(1);
            }
        }
    } else {
        println!(
            "{:?} after {} ticks: score {}, level {}, lives {}",
            snapshot.phase, snapshot.tick, snapshot.score, snapshot.level, snapshot.lives
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
