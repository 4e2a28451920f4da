//! Cinder Runtime
//!
//! Headless binary that loads settings, builds a world and steps the demo
//! simulation for a fixed number of ticks.

mod sim;

use anyhow::{Context, Result};
use cinder_core::ecs::Coordinator;
use cinder_core::time::SimulationTime;
use cinder_services::Settings;
use sim::{Expiry, Lifetime, Movement, Position, Spawner, Velocity};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RNG_SEED: u64 = 0x5eed;

fn main() -> Result<()> {
    // Settings pick the log level, so they load before the subscriber exists
    // and the load is reported once it does.
    let settings_path = std::env::args().nth(1);
    let settings = load_settings(settings_path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.default_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Cinder v{}", cinder_core::VERSION);
    info!(
        source = settings_path.as_deref().unwrap_or("<defaults>"),
        capacity = settings.ecs.entity_capacity,
        ticks = settings.simulation.ticks,
        "settings loaded"
    );

    let mut world = build_world(&settings)?;
    let mut time = SimulationTime::new();
    let dt = time.tick_seconds();

    for _ in 0..settings.simulation.ticks {
        if let Err(err) = world.run_systems(dt) {
            warn!(tick = time.tick_count(), error = %err, "tick finished with errors");
        }
        time.advance_tick();

        if time.tick_count() % 60 == 0 {
            info!(
                tick = time.tick_count(),
                living = world.living_entity_count(),
                "simulation progress"
            );
        }
    }

    let spawned = world.system::<Spawner>()?.spawned;
    let expired = world.system::<Expiry>()?.expired;
    info!(
        ticks = time.tick_count(),
        seconds = time.total_time().as_secs_f64(),
        spawned,
        expired,
        living = world.living_entity_count(),
        "simulation finished"
    );
    Ok(())
}

fn load_settings(path: Option<&str>) -> Result<Settings> {
    match path {
        Some(path) => {
            Settings::load(path).with_context(|| format!("loading settings from {path}"))
        }
        None => Ok(Settings::default()),
    }
}

fn build_world(settings: &Settings) -> Result<Coordinator> {
    let capacity = settings.ecs.entity_capacity;
    let mut world = Coordinator::with_entity_capacity(capacity)?;

    world.register_component::<Position>()?;
    world.register_component::<Velocity>()?;
    world.register_component::<Lifetime>()?;

    let sim = &settings.simulation;
    world.register_system(Spawner::new(
        sim.spawn_per_tick,
        sim.lifetime_ticks,
        capacity,
        RNG_SEED,
    ))?;
    world.register_system(Movement)?;
    world.register_system(Expiry::default())?;

    let moving = world.signature_of::<(Position, Velocity)>()?;
    world.set_system_signature::<Movement>(moving)?;
    let aging = world.signature_of::<(Lifetime,)>()?;
    world.set_system_signature::<Expiry>(aging)?;

    info!(capacity, systems = world.system_count(), "world ready");
    Ok(world)
}
