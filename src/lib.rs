//! Void Runner - a co-op top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, pooling, collisions, damage)
//! - `quality`: Adaptive quality control (FPS sampling with hysteresis)
//! - `settings`: Player preferences and quality presets
//! - `highscores`: Best-run leaderboard

pub mod highscores;
pub mod quality;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use quality::QualityController;
pub use settings::{QualityPreset, Settings};

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Frame deltas above this are clamped before accumulation
    pub const DT_MAX: f32 = 0.05;

    /// Arena dimensions (logical pixels)
    pub const ARENA_WIDTH: f32 = 1600.0;
    pub const ARENA_HEIGHT: f32 = 900.0;
    /// Ships cannot leave this margin around the arena edge
    pub const ARENA_MARGIN: f32 = 30.0;

    /// Per-kind live-entity ceilings (admission control)
    pub const MAX_BULLETS: usize = 650;
    pub const MAX_ENEMY_BOLTS: usize = 320;
    pub const MAX_ENEMIES: usize = 220;
    pub const MAX_PICKUPS: usize = 120;
    pub const MAX_PARTICLES: usize = 1000;
    pub const MAX_SHOCKWAVES: usize = 80;
    pub const MAX_OVERLAYS: usize = 32;

    /// Collision radii for the ship hull against each threat class
    pub const SHIP_HIT_RADIUS: f32 = 35.0;
    pub const SHIP_BOLT_RADIUS: f32 = 34.0;
    pub const PICKUP_GRAB_RADIUS: f32 = 35.0;

    /// Player defaults
    pub const PLAYER_MAX_HP: f32 = 280.0;
    pub const PLAYER_ARMOR: f32 = 0.42;
    pub const PLAYER_SPEED: f32 = 430.0;
    pub const PLAYER_SPEED_OVERDRIVE: f32 = 520.0;
    pub const SPAWN_INVULN: f32 = 1.6;
    pub const RESPAWN_DELAY: f32 = 2.8;
    pub const RESPAWN_INVULN: f32 = 2.2;

    /// Weapon thermal budget
    pub const HEAT_OVERHEAT: f32 = 115.0;
    pub const HEAT_REARM: f32 = 55.0;
    pub const HEAT_COOL_RATE: f32 = 42.0;
    pub const HEAT_COOL_OVERDRIVE: f32 = 62.0;

    /// Damage pipeline
    pub const SHIELD_ABSORB: f32 = 0.45;
    pub const SHIELD_FULL_ABSORB_BELOW: f32 = 10.0;
    pub const SHIELD_PULSE_INVULN: f32 = 0.16;
    pub const HIT_INVULN: f32 = 0.28;
    pub const MIN_HULL_DAMAGE: f32 = 5.0;
    pub const MAX_SHIELD_CHARGES: u32 = 8;

    /// Splash damage for heavy projectiles
    pub const SPLASH_DAMAGE_MIN: f32 = 8.0;
    pub const SPLASH_RADIUS_SCALE: f32 = 3.2;
    pub const SPLASH_FRACTION: f32 = 0.28;

    /// Wave progression and spawn pacing
    pub const WAVE_SCORE_STEP: f64 = 2600.0;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 0.28;
    pub const SPAWN_SCORE_SCALE: f64 = 22000.0;
    pub const DRONE_INTERVAL_FLOOR: f32 = 2.9;

    /// Overdrive powerup
    pub const OVERDRIVE_DURATION: f32 = 12.0;
    pub const OVERDRIVE_DELAY_SCALE: f32 = 0.52;
    pub const OVERDRIVE_HEAT_SCALE: f32 = 0.58;
}
