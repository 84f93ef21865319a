//! Ember Rift headless runner
//!
//! Loads the demo level, drives it with a scripted player and logs what
//! happens. Usage: `ember-rift [seed]`. Set `RUST_LOG=debug` for per-event
//! output.

use glam::Vec2;

use ember_rift::consts::SIM_DT;
use ember_rift::sim::{AiState, Direction, EventLog, GameEvent, TickInput, World, tick};
use ember_rift::{LevelDesc, SetupError, Tuning};

const DEFAULT_SEED: u64 = 0xE3B0;
/// Twenty seconds of game time
const DEMO_TICKS: u32 = 1200;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(seed) => seed,
            Err(_) => {
                log::warn!("ignoring bad seed '{}', using {}", arg, DEFAULT_SEED);
                DEFAULT_SEED
            }
        },
        None => DEFAULT_SEED,
    };

    if let Err(err) = run(seed) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the frontend drives `tick` itself
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn run(seed: u64) -> Result<(), SetupError> {
    log::info!("Ember Rift (headless) starting with seed {}", seed);

    let tuning = Tuning::default();
    let level = LevelDesc::demo()?;
    let mut world = World::from_level(&level, &tuning, seed)?;
    let mut fx = EventLog::new();

    let mut kills = 0;
    let mut deaths = 0;
    let mut landings = 0;
    for frame in 0..DEMO_TICKS {
        let input = scripted_input(&world, frame);
        let summary = tick(&mut world, &input, SIM_DT, &mut fx);

        for event in fx.drain() {
            match event {
                GameEvent::Tag { actor, tag } => log::trace!("#{} -> {}", actor, tag.as_str()),
                GameEvent::PlaySound { sound, at } => log::debug!("play {:?} at {:?}", sound, at),
                GameEvent::StopSound { sound } => log::debug!("stop {:?}", sound),
            }
        }
        if summary.player_motion.landed {
            landings += 1;
        }
        if summary.player_motion.hit_x {
            log::trace!("player blocked by a wall at {:?}", world.player.pos());
        }
        for id in &summary.killed {
            if *id == world.player.id {
                deaths += 1;
            } else {
                kills += 1;
            }
        }
    }

    let engaged = world.enemies.iter().filter(|e| e.ai.state().is_engaged()).count();
    let wandering = world
        .enemies
        .iter()
        .filter(|e| e.ai.state() == AiState::MoveAround)
        .count();
    log::info!(
        "finished {} ticks ({:.1}s): {} kills, {} deaths, {} landings, {} enemies left ({} engaged, {} wandering), player at {:?} with {} hp",
        world.time_ticks,
        world.now(),
        kills,
        deaths,
        landings,
        world.enemies.len(),
        engaged,
        wandering,
        world.player.pos(),
        world.player.hitpoints()
    );
    Ok(())
}

/// Patrol back and forth, hop now and then, shoot at whatever is ahead
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn scripted_input(world: &World, frame: u32) -> TickInput {
    let direction = match frame % 480 {
        0..=179 => Direction::Right,
        180..=239 => Direction::Idle,
        240..=419 => Direction::Left,
        _ => Direction::Idle,
    };
    let aim = Vec2::new(world.player.facing_sign(), 0.0);
    TickInput {
        direction,
        jump: frame % 150 == 75,
        shoot: (frame % 20 == 0).then_some(aim),
        respawn: !world.player.is_alive(),
    }
}
