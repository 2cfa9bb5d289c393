//! Shared simulation state, input intents and outbound events
//!
//! All run-wide mutable state lives in one `SimulationState` struct that is
//! passed explicitly into each subsystem; score, combo, shield and lives are
//! only ever mutated through the damage/collision/director entry points.

use rand_pcg::Pcg32;

use super::difficulty::{Difficulty, difficulty_for};
use super::weapons::WeaponKind;
use crate::consts::*;

/// Stream selectors for the two PCG sequences. Gameplay and cosmetics draw
/// from separate streams so a quality change (which skips cosmetic spawns)
/// can never perturb gameplay outcomes.
const GAMEPLAY_STREAM: u64 = 0xa02b_dbf7_bb3c_0a7;
const FX_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;

/// One or two ships sharing the team pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerMode {
    #[default]
    Solo,
    Duo,
}

impl PlayerMode {
    pub fn player_count(self) -> usize {
        match self {
            PlayerMode::Solo => 1,
            PlayerMode::Duo => 2,
        }
    }

    /// Team-shared shield charges at run start.
    pub fn initial_shield(self) -> u32 {
        match self {
            PlayerMode::Solo => 7,
            PlayerMode::Duo => 6,
        }
    }

    /// Team-shared lives at run start.
    pub fn initial_lives(self) -> u32 {
        match self {
            PlayerMode::Solo => 9,
            PlayerMode::Duo => 7,
        }
    }
}

/// Discrete per-player input snapshot for one fixed step.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerIntent {
    /// Movement axes in [-1, 1]; +y is down-screen
    pub axis_x: f32,
    pub axis_y: f32,
    pub fire: bool,
    /// Edge event: cycle to the next weapon
    pub cycle_weapon: bool,
}

/// Input for one fixed step, both seats.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub players: [PlayerIntent; 2],
}

/// Sound-effect requests. Fire-and-forget: the shell may drop them freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sfx {
    Shoot,
    ShootLaser,
    ShootMissile,
    ShootRailgun,
    Plasma,
    Hit,
    PlayerHit,
    Explode,
    BigExplosion { intensity: f32 },
    Powerup,
    Overheat,
    Combo { mult: f32 },
    EnemyShot,
    DroneExplode,
    ShieldAbsorb,
    UtilityPickup,
    OverdriveStart,
}

/// Status-line content. The core names the situation; the shell renders it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    WaveLabel(u32),
    Ready,
    Overheated,
    HullCritical { player: u8 },
    LastChance,
    ShieldBoost,
    TeamCoolant,
    OverdriveOnline,
    WeaponSwap { player: u8, weapon: WeaponKind },
}

impl StatusKind {
    pub fn label(&self) -> String {
        match self {
            StatusKind::WaveLabel(1) => "LEVEL 1: CALIBRATION".into(),
            StatusKind::WaveLabel(2) => "LEVEL 2: ESCALATION".into(),
            StatusKind::WaveLabel(n) => format!("LEVEL {n}: ONSLAUGHT"),
            StatusKind::Ready => "READY".into(),
            StatusKind::Overheated => "WEAPON OVERHEATED".into(),
            StatusKind::HullCritical { player } => format!("P{} HULL CRITICAL", player + 1),
            StatusKind::LastChance => "CRITICAL: LAST CHANCE".into(),
            StatusKind::ShieldBoost => "SHIELD BOOST +2".into(),
            StatusKind::TeamCoolant => "TEAM COOLANT ACTIVE".into(),
            StatusKind::OverdriveOnline => "OVERDRIVE ONLINE".into(),
            StatusKind::WeaponSwap { player, weapon } => {
                format!("P{} WEAPON: {}", player + 1, weapon.name())
            }
        }
    }
}

/// Side-effect requests emitted during a step and drained by the shell.
/// Delivery failure must not affect simulation correctness.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Sfx(Sfx),
    Status(StatusKind),
    WaveReached(u32),
    GameOver {
        score: u64,
        kills: u32,
        max_combo: u32,
    },
}

/// Status line with an explicit countdown instead of a deferred callback;
/// `ttl <= 0` means the line is sticky until replaced.
#[derive(Debug, Clone, Copy)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub ttl: f32,
}

/// Complete run-wide simulation state.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub running: bool,
    pub game_over: bool,
    pub mode: PlayerMode,
    pub width: f32,
    pub height: f32,
    pub seed: u64,

    pub time_ticks: u64,
    pub score: f64,
    pub kills: u32,
    pub combo: f32,
    pub combo_timer: f32,
    pub max_combo: f32,
    pub wave: u32,
    pub difficulty: Difficulty,

    /// Team-shared shield charges; consumed by the damage pipeline
    pub shield_charges: u32,
    /// Team-shared lives; respawns stop at zero
    pub team_lives: u32,
    pub overdrive_timer: f32,

    pub spawn_timer: f32,
    pub drone_timer: f32,

    /// Render-facing: screen shake magnitude, decays per step
    pub shake: f32,
    /// Whole fixed steps to freeze after a heavy kill
    pub hit_stop: u32,
    pub status: StatusLine,
    pub events: Vec<Event>,

    /// Gameplay stream: spawns, drops, enemy jitter
    pub rng: Pcg32,
    /// Cosmetic stream: particle scatter only
    pub fx_rng: Pcg32,
}

impl SimulationState {
    pub fn new(seed: u64, mode: PlayerMode) -> Self {
        Self {
            running: false,
            game_over: false,
            mode,
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            seed,
            time_ticks: 0,
            score: 0.0,
            kills: 0,
            combo: 1.0,
            combo_timer: 0.0,
            max_combo: 1.0,
            wave: 1,
            difficulty: difficulty_for(1),
            shield_charges: mode.initial_shield(),
            team_lives: mode.initial_lives(),
            overdrive_timer: 0.0,
            spawn_timer: 0.0,
            drone_timer: 0.0,
            shake: 0.0,
            hit_stop: 0,
            status: StatusLine {
                kind: StatusKind::WaveLabel(1),
                ttl: 0.0,
            },
            events: Vec::new(),
            rng: Pcg32::new(seed, GAMEPLAY_STREAM),
            fx_rng: Pcg32::new(seed, FX_STREAM),
        }
    }

    /// Begin (or restart) a run with fresh counters and RNG streams.
    pub fn start(&mut self) {
        *self = Self::new(self.seed, self.mode);
        self.running = true;
    }

    pub fn overdrive_active(&self) -> bool {
        self.overdrive_timer > 0.0
    }

    pub fn push_sfx(&mut self, sfx: Sfx) {
        self.events.push(Event::Sfx(sfx));
    }

    /// Replace the status line; it reverts to the wave label once `ttl`
    /// expires (decremented on the fixed-step clock in `tick`).
    pub fn set_status(&mut self, kind: StatusKind, ttl: f32) {
        self.status = StatusLine { kind, ttl };
        self.events.push(Event::Status(kind));
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.shake += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_determines_team_pools() {
        let solo = SimulationState::new(1, PlayerMode::Solo);
        let duo = SimulationState::new(1, PlayerMode::Duo);
        assert_eq!(solo.shield_charges, 7);
        assert_eq!(solo.team_lives, 9);
        assert_eq!(duo.shield_charges, 6);
        assert_eq!(duo.team_lives, 7);
    }

    #[test]
    fn start_resets_counters_but_keeps_seed() {
        let mut state = SimulationState::new(42, PlayerMode::Solo);
        state.score = 9000.0;
        state.kills = 12;
        state.game_over = true;
        state.start();
        assert!(state.running);
        assert!(!state.game_over);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.kills, 0);
        assert_eq!(state.seed, 42);
    }

    #[test]
    fn status_change_is_mirrored_as_event() {
        let mut state = SimulationState::new(1, PlayerMode::Solo);
        state.set_status(StatusKind::TeamCoolant, 2.0);
        assert_eq!(state.status.kind, StatusKind::TeamCoolant);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, Event::Status(StatusKind::TeamCoolant)))
        );
    }

    #[test]
    fn wave_labels_follow_the_campaign_names() {
        assert_eq!(StatusKind::WaveLabel(1).label(), "LEVEL 1: CALIBRATION");
        assert_eq!(StatusKind::WaveLabel(2).label(), "LEVEL 2: ESCALATION");
        assert_eq!(StatusKind::WaveLabel(7).label(), "LEVEL 7: ONSLAUGHT");
    }
}
