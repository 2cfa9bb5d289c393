//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (separate gameplay and cosmetic streams)
//! - Pooled entities, capacity-capped spawns, end-of-step compaction
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod damage;
pub mod difficulty;
pub mod entities;
pub mod pool;
pub mod registry;
pub mod state;
pub mod tick;
pub mod weapons;

pub use clock::SimulationClock;
pub use difficulty::{Difficulty, difficulty_for, wave_for_score};
pub use entities::{
    Enemy, EnemyBolt, EnemyKind, Material, OverlayFlash, Particle, Pickup, PickupPayload, Player,
    Projectile, ProjectileKind, Shockwave, UtilityKind,
};
pub use pool::ObjectPool;
pub use registry::{EntityRegistry, LiveCounts, PoolStats, RegistryCaps};
pub use state::{
    Event, PlayerIntent, PlayerMode, Sfx, SimulationState, StatusKind, TickInput,
};
pub use tick::step;
pub use weapons::WeaponKind;

use crate::consts::MAX_PARTICLES;
use crate::quality::QualityController;

/// The complete simulation: run state, entity registry and the fixed-step
/// clock, driven by one `advance` call per animation frame.
pub struct Simulation {
    pub state: SimulationState,
    pub registry: EntityRegistry,
    pub clock: SimulationClock,
}

impl Simulation {
    pub fn new(seed: u64, mode: PlayerMode) -> Self {
        let state = SimulationState::new(seed, mode);
        let mut registry = EntityRegistry::new();
        registry.reset_run(mode.player_count(), state.width, state.height);
        Self {
            state,
            registry,
            clock: SimulationClock::default(),
        }
    }

    /// Begin (or restart) a run: fresh counters, fresh roster, empty clock.
    pub fn start(&mut self) {
        self.state.start();
        self.registry.reset_run(
            self.state.mode.player_count(),
            self.state.width,
            self.state.height,
        );
        self.clock.reset();
    }

    /// Feed one animation frame's elapsed wall time. The same input intent
    /// applies to every fixed step run within the frame. Returns the number
    /// of steps executed.
    pub fn advance(&mut self, frame_delta: f32, input: &TickInput) -> u32 {
        let Self {
            state,
            registry,
            clock,
        } = self;
        clock.advance(frame_delta, |dt| tick::step(state, registry, input, dt))
    }

    /// Run exactly one fixed step (tests and headless drivers).
    pub fn step(&mut self, input: &TickInput) {
        tick::step(
            &mut self.state,
            &mut self.registry,
            input,
            self.clock.step_size(),
        );
    }

    /// Take this frame's accumulated side-effect requests.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.state.events)
    }

    /// Propagate the quality controller's decision into the cosmetic
    /// budgets. Gameplay state is untouched by design.
    pub fn apply_quality(&mut self, quality: &QualityController) {
        let budget = (MAX_PARTICLES as f32 * quality.particle_scale()) as usize;
        self.registry
            .set_quality(budget, quality.particle_scale(), quality.glow_enabled());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn advance_runs_whole_steps_only() {
        let mut sim = Simulation::new(1, PlayerMode::Solo);
        sim.start();
        let steps = sim.advance(SIM_DT * 2.5, &TickInput::default());
        assert_eq!(steps, 2);
        assert_eq!(sim.state.time_ticks, 2);
    }

    #[test]
    fn restart_clears_the_arena() {
        let mut sim = Simulation::new(1, PlayerMode::Duo);
        sim.start();
        for _ in 0..600 {
            sim.step(&TickInput::default());
        }
        sim.start();
        assert_eq!(sim.state.time_ticks, 0);
        assert!(sim.registry.enemies.is_empty());
        assert_eq!(sim.registry.players.len(), 2);
    }

    #[test]
    fn events_drain_once() {
        let mut sim = Simulation::new(1, PlayerMode::Solo);
        sim.start();
        sim.state.push_sfx(Sfx::Hit);
        assert_eq!(sim.drain_events().len(), 1);
        assert!(sim.drain_events().is_empty());
    }
}
