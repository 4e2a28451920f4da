//! Headless demo simulation: particles that spawn, drift and expire.

use cinder_core::define_component;
use cinder_core::ecs::{EntityBuilder, System, SystemContext};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);
define_component!(Position);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);
define_component!(Velocity);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub remaining: u32,
}
define_component!(Lifetime);

/// Small LCG so runs are reproducible without pulling in an RNG crate.
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    /// Uniform in `[-1, 1)`.
    pub fn next_signed(&mut self) -> f32 {
        self.next_u32() as f32 / (1u64 << 31) as f32 - 1.0
    }
}

/// Queues new particles each tick while the pool has room.
pub struct Spawner {
    pub per_tick: u32,
    pub lifetime: u32,
    pub capacity: usize,
    pub spawned: u64,
    rng: DeterministicRng,
}

impl Spawner {
    pub fn new(per_tick: u32, lifetime: u32, capacity: usize, seed: u64) -> Self {
        Self {
            per_tick,
            lifetime,
            capacity,
            spawned: 0,
            rng: DeterministicRng::new(seed),
        }
    }
}

impl System for Spawner {
    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) {
        let room = self.capacity.saturating_sub(ctx.living_entity_count());
        let count = (self.per_tick as usize).min(room);
        for _ in 0..count {
            let velocity = Vec2::new(self.rng.next_signed(), self.rng.next_signed()) * 4.0;
            ctx.commands().spawn(
                EntityBuilder::new()
                    .with(Position(Vec2::ZERO))
                    .with(Velocity(velocity))
                    .with(Lifetime {
                        remaining: self.lifetime,
                    }),
            );
        }
        self.spawned += count as u64;
    }
}

/// Integrates position from velocity. Requires (Position, Velocity).
#[derive(Default)]
pub struct Movement;

impl System for Movement {
    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {
        for entity in ctx.entity_list() {
            let Some(Velocity(velocity)) = ctx.try_component::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(Position(position)) = ctx.try_component_mut::<Position>(entity) {
                *position += velocity * dt;
            }
        }
    }
}

/// Counts lifetimes down and destroys expired entities. Requires (Lifetime).
#[derive(Default)]
pub struct Expiry {
    pub expired: u64,
}

impl System for Expiry {
    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) {
        for entity in ctx.entity_list() {
            let Some(lifetime) = ctx.try_component_mut::<Lifetime>(entity) else {
                continue;
            };
            lifetime.remaining = lifetime.remaining.saturating_sub(1);
            if lifetime.remaining == 0 {
                ctx.commands().destroy_entity(entity);
                self.expired += 1;
            }
        }
    }
}
