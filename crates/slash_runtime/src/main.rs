//! Slash headless runtime
//!
//! Drives a `ProjectileWorld` at a fixed tick with a scripted hand on its own
//! thread and logs what happens. No window; a renderer would consume the same
//! poses and mesh uploads this loop only counts.
//!
//! Run with: cargo run -p slash_runtime -- --config slash.toml
//!       or: SLASH_CONFIG=slash.toml cargo run --bin slash

mod hand;
mod run_config;

use std::time::{Duration, Instant};

use slash_physics::{GameEvent, ProjectileWorld};

use crate::hand::HandThread;
use crate::run_config::{RunConfig, RuntimeError};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), RuntimeError> {
    let config = RunConfig::load(std::env::args().skip(1))?;
    config.log_summary();

    let mut world = ProjectileWorld::new(config.simulation.clone())?;
    let events = world.subscribe();
    let hand = HandThread::spawn(config.run.hand, world.hand_feed())
        .map_err(RuntimeError::HandThread)?;

    let dt = config.run.dt();
    let period = Duration::from_secs_f32(dt);
    let total = config.run.total_ticks();
    let mut next_tick = Instant::now();
    let mut uploads = 0usize;
    let mut ticks = 0u64;

    while ticks < total {
        world.advance(dt)?;
        ticks += 1;

        for event in events.try_iter() {
            log_event(&event);
        }
        uploads += world.drain_mesh_uploads().len();

        if ticks % u64::from(config.run.tick_hz.max(1)) == 0 {
            log::debug!(
                "t={:.1}s bodies={} score={} blade={:?}",
                world.elapsed(),
                world.active_count(),
                world.score(),
                world.blade().position()
            );
        }

        if world.is_game_over() && world.active_count() == 0 {
            log::info!("Scene settled after game over");
            break;
        }

        if config.run.realtime {
            next_tick += period;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                // Fell behind; don't try to catch up
                next_tick = now;
            }
        }
    }

    let published = hand.stop();
    let stats = world.mesh_cache_stats();
    log::info!("Run finished:");
    log::info!("  Ticks: {} ({:.1} s simulated)", ticks, world.elapsed());
    log::info!("  Score: {}", world.score());
    log::info!("  Game over: {}", world.is_game_over());
    log::info!("  Hand estimates: {}", published);
    log::info!("  Mesh uploads: {}", uploads);
    log::info!(
        "  Mesh cache: {} meshes, {} hits, {} misses, {} fragments cut",
        stats.mesh_count, stats.hits, stats.misses, stats.fragments_built
    );
    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Spawned { handle, kind } => log::debug!("spawned {kind} as {handle}"),
        GameEvent::Sliced { original, fragments, kind, generation } => log::debug!(
            "{kind} {original} (gen {generation}) cut into {} and {}",
            fragments[0], fragments[1]
        ),
        GameEvent::ScoreIncreased { score } => log::info!("Score: {score}"),
        GameEvent::GameOver { score, kind } => {
            log::warn!("GAME OVER: a {kind} got through. Final score {score}")
        }
    }
}
