//! Wave-indexed difficulty director
//!
//! A pure function from wave number to spawn pacing and enemy stat
//! multipliers. Every enemy captures the snapshot in force at its spawn
//! moment; a wave change mid-flight never retroactively buffs or nerfs an
//! already-spawned enemy.

use crate::consts::WAVE_SCORE_STEP;

/// Difficulty snapshot for one wave. All multipliers are relative to the
/// wave-2 baseline of 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub level: u32,
    pub enemy_hp: f32,
    pub enemy_speed: f32,
    pub enemy_fire_rate: f32,
    pub enemy_bolt_speed: f32,
    pub enemy_damage: f32,
    /// Seconds between asteroid spawn bursts (before score-based tightening)
    pub spawn_interval: f32,
    /// Expected asteroids per burst
    pub density: f32,
    /// Maximum simultaneous drones
    pub drone_cap: u32,
    /// Seconds between drone spawn attempts
    pub drone_interval: f32,
    /// How far enemies lead a moving target, 0..=0.95
    pub ai_lead: f32,
}

/// Wave derived from cumulative score via a monotone step function.
pub fn wave_for_score(score: f64) -> u32 {
    1 + (score / WAVE_SCORE_STEP).floor() as u32
}

/// Map a wave number to its difficulty snapshot.
///
/// Wave 1 is a calibration level (everything below baseline), wave 2 the
/// escalation baseline, and later waves scale linearly with clamps so the
/// game stays playable: `spawn_interval` never drops below 0.3,
/// `drone_interval` never below 3.2, `drone_cap` tops out at 8 and
/// `ai_lead` at 0.95.
pub fn difficulty_for(wave: u32) -> Difficulty {
    if wave <= 1 {
        return Difficulty {
            level: 1,
            enemy_hp: 0.85,
            enemy_speed: 0.82,
            enemy_fire_rate: 0.78,
            enemy_bolt_speed: 0.82,
            enemy_damage: 0.78,
            spawn_interval: 1.65,
            density: 1.0,
            drone_cap: 1,
            drone_interval: 11.5,
            ai_lead: 0.08,
        };
    }

    if wave == 2 {
        return Difficulty {
            level: 2,
            enemy_hp: 1.1,
            enemy_speed: 1.03,
            enemy_fire_rate: 1.08,
            enemy_bolt_speed: 1.05,
            enemy_damage: 1.0,
            spawn_interval: 1.2,
            density: 1.2,
            drone_cap: 2,
            drone_interval: 8.4,
            ai_lead: 0.2,
        };
    }

    let scale = (wave - 2) as f32;
    Difficulty {
        level: wave,
        enemy_hp: 1.1 + scale * 0.22,
        enemy_speed: 1.03 + scale * 0.14,
        enemy_fire_rate: 1.08 + scale * 0.12,
        enemy_bolt_speed: 1.05 + scale * 0.15,
        enemy_damage: 1.0 + scale * 0.13,
        spawn_interval: (1.2 - scale * 0.08).max(0.3),
        density: 1.2 + scale * 0.22,
        drone_cap: (2 + wave - 2).min(8),
        drone_interval: (8.4 - scale * 0.55).max(3.2),
        ai_lead: (0.2 + scale * 0.11).min(0.95),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_steps_with_score() {
        assert_eq!(wave_for_score(0.0), 1);
        assert_eq!(wave_for_score(2599.9), 1);
        assert_eq!(wave_for_score(2600.0), 2);
        assert_eq!(wave_for_score(13_000.0), 6);
    }

    #[test]
    fn calibration_wave_is_softer_than_baseline() {
        let d1 = difficulty_for(1);
        let d2 = difficulty_for(2);
        assert!(d1.enemy_hp < d2.enemy_hp);
        assert!(d1.enemy_damage < d2.enemy_damage);
        assert!(d1.spawn_interval > d2.spawn_interval);
        assert!(d1.drone_cap < d2.drone_cap);
    }

    #[test]
    fn monotone_and_clamped() {
        for wave in 1..80 {
            let cur = difficulty_for(wave);
            let next = difficulty_for(wave + 1);
            assert!(next.enemy_hp >= cur.enemy_hp);
            assert!(next.enemy_speed >= cur.enemy_speed);
            assert!(next.enemy_fire_rate >= cur.enemy_fire_rate);
            assert!(next.enemy_damage >= cur.enemy_damage);
            assert!(next.density >= cur.density);
            assert!(next.spawn_interval <= cur.spawn_interval);
            assert!(next.spawn_interval >= 0.3);
            assert!(next.drone_interval >= 3.2);
            assert!(next.drone_cap <= 8);
            assert!(next.ai_lead <= 0.95);
        }
    }

    #[test]
    fn late_game_hits_the_floors() {
        let d = difficulty_for(60);
        assert_eq!(d.spawn_interval, 0.3);
        assert_eq!(d.drone_interval, 3.2);
        assert_eq!(d.drone_cap, 8);
        assert_eq!(d.ai_lead, 0.95);
    }
}
