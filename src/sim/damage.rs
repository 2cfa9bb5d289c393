//! Damage model: absorption pipeline, elimination and respawn
//!
//! All hull/shield/lives mutation funnels through here. The pipeline is
//! shield (team resource) -> armor -> hull, gated by the per-ship
//! invulnerability window so overlapping colliders cannot chain hits
//! within the same or adjacent steps.

use glam::Vec2;
use rand::Rng;

use super::entities::{Enemy, EnemyKind, PickupPayload, Player, UtilityKind, palette};
use super::registry::{EntityRegistry, random_weapon};
use super::state::{Event, Sfx, SimulationState, StatusKind};
use crate::consts::*;

const DRONE_EXPLOSION: [u32; 3] = [0xff7f96, 0x87d6ff, 0xffffff];
const SHIP_EXPLOSION_P1: [u32; 3] = [0x00f3ff, 0x4da9ff, 0xffffff];
const SHIP_EXPLOSION_P2: [u32; 3] = [0xff5ef2, 0xff9bdc, 0xffffff];

/// Apply a hit to a player ship.
///
/// While a shield charge is available it is consumed first: the charge
/// soaks `1 - SHIELD_ABSORB` of the damage, grants a short invulnerability
/// pulse, and fully absorbs anything that comes out below the absorb
/// threshold. Whatever survives is reduced by the armor fraction (floored
/// at `MIN_HULL_DAMAGE`) and taken from the hull, never below zero.
pub fn damage_player(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    player: &mut Player,
    raw_damage: f32,
    hit: Vec2,
) {
    if !player.alive || player.invuln > 0.0 || state.game_over {
        return;
    }

    let mut incoming = raw_damage;
    if state.shield_charges > 0 {
        state.shield_charges -= 1;
        incoming *= SHIELD_ABSORB;
        state.add_shake(7.0);
        state.push_sfx(Sfx::ShieldAbsorb);
        let ring = if player.index == 0 {
            palette::SHIELD_P1
        } else {
            palette::SHIELD_P2
        };
        registry.spawn_impact(state, hit, ring, 1.35);
        player.invuln = SHIELD_PULSE_INVULN;
        if incoming < SHIELD_FULL_ABSORB_BELOW {
            return;
        }
    }

    let reduced = (incoming * (1.0 - player.armor)).max(MIN_HULL_DAMAGE);
    player.hp = (player.hp - reduced).max(0.0);
    player.damage_flash = 1.0;
    player.invuln = HIT_INVULN;
    state.add_shake((1.5 + reduced * 0.12).min(9.0));
    state.push_sfx(Sfx::PlayerHit);
    let spark = if player.index == 0 {
        palette::HULL_P1
    } else {
        palette::HULL_P2
    };
    registry.spawn_impact(state, hit, spark, 1.15);

    if player.hp <= 0.0 {
        eliminate_player(state, registry, player, hit);
        return;
    }

    if player.hp / player.max_hp < 0.25 {
        state.set_status(StatusKind::HullCritical { player: player.index }, 2.0);
    }
}

/// Alive -> Eliminated transition: burn one team life and start the
/// respawn countdown. The terminal GameOver check runs once per step in
/// `finalize_game_over` so a mid-resolution elimination cannot observe a
/// half-updated roster.
pub fn eliminate_player(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    player: &mut Player,
    hit: Vec2,
) {
    if !player.alive {
        return;
    }

    state.team_lives = state.team_lives.saturating_sub(1);
    player.alive = false;
    player.hp = 0.0;
    player.respawn_timer = RESPAWN_DELAY;
    state.add_shake(12.0);
    let colors = if player.index == 0 {
        &SHIP_EXPLOSION_P1
    } else {
        &SHIP_EXPLOSION_P2
    };
    registry.spawn_explosion(state, hit, 1.9, colors);
    state.push_sfx(Sfx::Explode);

    if state.team_lives <= 2 {
        state.set_status(StatusKind::LastChance, 2.0);
    }
}

/// Terminal transition: all ships down and no lives left ends the run.
pub fn finalize_game_over(state: &mut SimulationState, registry: &EntityRegistry) {
    if state.game_over {
        return;
    }
    if state.team_lives == 0 && registry.players.iter().all(|p| !p.alive) {
        state.game_over = true;
        state.running = false;
        state.events.push(Event::GameOver {
            score: state.score.floor() as u64,
            kills: state.kills,
            max_combo: state.max_combo.floor() as u32,
        });
    }
}

/// Subtract projectile/splash damage from an enemy; kills route through the
/// scoring and drop tables.
pub fn damage_enemy(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    enemy: &mut Enemy,
    amount: f32,
) {
    if enemy.dead {
        return;
    }
    enemy.hp -= amount;
    enemy.flash = 1.0;

    if enemy.hp <= 0.0 {
        enemy.dead = true;
        enemy_killed(state, registry, enemy);
        return;
    }

    // Survived: hit feedback only.
    match enemy.kind {
        EnemyKind::Asteroid { material, .. } => {
            state.push_sfx(Sfx::Hit);
            spawn_hit_sparks(state, registry, enemy.pos, material.hit_color(), 9);
        }
        EnemyKind::Drone { .. } => {
            state.push_sfx(Sfx::Hit);
            state.add_shake(0.8);
            spawn_hit_sparks(state, registry, enemy.pos, palette::DRONE_HIT, 10);
        }
    }
}

fn spawn_hit_sparks(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    pos: Vec2,
    color: u32,
    count: usize,
) {
    let scaled = (registry.fx_scale() * count as f32) as usize;
    for _ in 0..scaled {
        let def = super::entities::ParticleDef {
            color,
            size: 3.4,
            speed: 150.0,
            life: 0.55,
            drag: 0.92,
            additive: true,
            glow: true,
        };
        registry.spawn_particle(pos, &def, &mut state.fx_rng);
    }
}

fn enemy_killed(state: &mut SimulationState, registry: &mut EntityRegistry, enemy: &Enemy) {
    match enemy.kind {
        EnemyKind::Asteroid {
            size_class,
            material,
            ..
        } => {
            let intensity = match size_class {
                1 => 0.95,
                2 => 1.45,
                _ => 2.05,
            };
            registry.spawn_explosion(state, enemy.pos, intensity, material.explosion_palette());

            state.combo_timer = 3.0;
            state.combo = (state.combo + 0.25).min(12.0);
            state.max_combo = state.max_combo.max(state.combo);
            state.score += size_class as f64 * 150.0 * state.combo as f64;
            state.kills += 1;
            state.add_shake(size_class as f32 * 4.0);
            state.hit_stop = size_class as u32 + 1;
            state.push_sfx(Sfx::Combo { mult: state.combo });

            if state.rng.random::<f32>() < material.drop_chance() {
                let force_utility =
                    state.rng.random::<f32>() < material.force_utility_chance();
                spawn_drop(state, registry, enemy.pos, None, force_utility);
            }
        }
        EnemyKind::Drone { .. } => {
            registry.spawn_explosion(state, enemy.pos, 1.45, &DRONE_EXPLOSION);

            state.combo_timer = 3.6;
            state.combo = (state.combo + 0.45).min(14.0);
            state.max_combo = state.max_combo.max(state.combo);
            state.kills += 1;
            state.score += 380.0 * state.combo as f64;
            state.add_shake(10.0);
            state.push_sfx(Sfx::DroneExplode);

            if state.rng.random::<f32>() < 0.38 {
                let roll = state.rng.random::<f32>();
                let utility = if roll < 0.34 {
                    UtilityKind::Shield
                } else if roll < 0.68 {
                    UtilityKind::Coolant
                } else {
                    UtilityKind::Overdrive
                };
                spawn_drop(state, registry, enemy.pos, Some(utility), true);
            }
        }
    }
}

/// Roll and spawn a pickup. A non-forced drop is a utility with p = 0.22,
/// otherwise a uniformly random weapon crate.
fn spawn_drop(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    pos: Vec2,
    utility: Option<UtilityKind>,
    force_utility: bool,
) {
    let use_utility = force_utility || state.rng.random::<f32>() < 0.22;
    let payload = if use_utility {
        let kind = utility.unwrap_or_else(|| {
            match state.rng.random_range(0..3) {
                0 => UtilityKind::Shield,
                1 => UtilityKind::Coolant,
                _ => UtilityKind::Overdrive,
            }
        });
        PickupPayload::Utility(kind)
    } else {
        PickupPayload::Weapon(random_weapon(&mut state.rng))
    };
    registry.spawn_pickup(pos, payload);
}
