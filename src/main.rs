//! Void Runner entry point
//!
//! Headless native shell: drives the simulation core with a scripted
//! autopilot session and logs the run. A graphical frontend is a separate
//! collaborator - it would feed real input intents into `Simulation::advance`
//! and draw from the registry's live collections each frame.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use void_runner::sim::{Event, PlayerMode, Simulation, TickInput};
use void_runner::{HighScores, QualityController, Settings};

const SETTINGS_PATH: &str = "void-runner-settings.json";
const SCORES_PATH: &str = "void-runner-scores.json";

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);

    let settings = Settings::load(Path::new(SETTINGS_PATH));
    log::info!(
        "Void Runner starting (seed {seed}, quality {})",
        settings.quality.as_str()
    );

    let mut sim = Simulation::new(seed, PlayerMode::Solo);
    sim.registry.set_quality(
        settings.max_particles(),
        1.0,
        settings.quality.bloom_allowed(),
    );
    let mut quality = QualityController::default();
    sim.start();

    // 90 seconds of play at a simulated 60 fps display.
    let frame_dt = 1.0 / 60.0;
    let mut sfx_cues = 0usize;
    for frame in 0..90 * 60u32 {
        let input = autopilot(frame);
        sim.advance(frame_dt, &input);

        if quality.sample(frame_dt).is_some() {
            sim.apply_quality(&quality);
        }

        for event in sim.drain_events() {
            match event {
                Event::WaveReached(wave) => {
                    log::info!(
                        "wave {wave} reached at score {}",
                        sim.state.score.floor() as u64
                    );
                }
                Event::GameOver {
                    score,
                    kills,
                    max_combo,
                } => {
                    log::info!("game over: score {score}, kills {kills}, best combo x{max_combo}");
                }
                Event::Status(kind) => log::debug!("status: {}", kind.label()),
                Event::Sfx(_) => sfx_cues += 1,
            }
        }

        if sim.state.game_over {
            break;
        }
    }

    let counts = sim.registry.live_counts();
    log::info!(
        "session done: score {} | kills {} | wave {} | {} sfx cues | {} live enemies, {} particles",
        sim.state.score.floor() as u64,
        sim.state.kills,
        sim.state.wave,
        sfx_cues,
        counts.enemies,
        counts.particles,
    );

    record_high_score(&sim);
}

fn record_high_score(sim: &Simulation) {
    let path = Path::new(SCORES_PATH);
    let mut scores = HighScores::load(path);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let final_score = sim.state.score.floor() as u64;
    if let Some(rank) = scores.add_score(final_score, sim.state.wave, sim.state.kills, timestamp) {
        log::info!("high score! rank {rank} with {final_score}");
        scores.save(path);
    }
}

/// Deterministic autopilot: sine-strafe through the field with the trigger
/// held. Enough to exercise spawning, combat and the damage pipeline.
fn autopilot(frame: u32) -> TickInput {
    let t = frame as f32 / 60.0;
    let mut input = TickInput::default();
    input.players[0].axis_x = (t * 0.7).sin();
    input.players[0].axis_y = (t * 0.23).sin() * 0.4;
    input.players[0].fire = true;
    input
}
