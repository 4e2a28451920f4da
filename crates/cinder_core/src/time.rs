//! Fixed-step simulation time
//!
//! The simulation advances in whole 60 Hz ticks; systems always see the
//! same `dt`.

use std::time::Duration;

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666);

/// Simulation time tracker
#[derive(Debug, Default)]
pub struct SimulationTime {
    tick_count: u64,
    elapsed: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seconds per tick, as handed to `System::update`.
    pub fn tick_seconds(&self) -> f32 {
        TICK_DURATION.as_secs_f32()
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
        self.elapsed += TICK_DURATION;
    }

    /// Simulated time elapsed over every tick so far.
    pub fn total_time(&self) -> Duration {
        self.elapsed
    }
}
