//! Pairwise collision resolution
//!
//! Stateless circle-circle tests between the live collections, run once per
//! fixed step. Hits only mark entities dead and route damage through the
//! damage model; physical removal waits for the compaction pass so
//! iteration is never invalidated mid-step.

use glam::Vec2;

use super::damage::{damage_enemy, damage_player};
use super::entities::{ParticleDef, PickupPayload, UtilityKind, palette};
use super::registry::EntityRegistry;
use super::state::{Sfx, SimulationState, StatusKind};
use crate::consts::*;

/// Circle-circle overlap test shared by every collision pass.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Run every collision pass for one fixed step, in a fixed order:
/// player shots, ramming, enemy fire, then pickups.
pub fn resolve(state: &mut SimulationState, registry: &mut EntityRegistry) {
    projectiles_vs_enemies(state, registry);
    enemies_vs_players(state, registry);
    bolts_vs_players(state, registry);
    pickups_vs_players(state, registry);
}

fn projectiles_vs_enemies(state: &mut SimulationState, registry: &mut EntityRegistry) {
    let mut bullets = std::mem::take(&mut registry.bullets);
    let mut enemies = std::mem::take(&mut registry.enemies);

    for bullet in bullets.iter_mut() {
        if bullet.dead {
            continue;
        }
        for i in 0..enemies.len() {
            if enemies[i].dead {
                continue;
            }
            if !circles_overlap(bullet.pos, bullet.radius, enemies[i].pos, enemies[i].radius) {
                continue;
            }

            let impact_scale = (bullet.radius / 6.0).max(0.8);
            registry.spawn_impact(state, bullet.pos, bullet.color, impact_scale);

            // Heavy hits splash a fraction of their damage onto bystanders.
            if bullet.damage >= SPLASH_DAMAGE_MIN {
                let splash_radius = bullet.radius * SPLASH_RADIUS_SCALE;
                for j in 0..enemies.len() {
                    if j == i || enemies[j].dead {
                        continue;
                    }
                    if circles_overlap(bullet.pos, splash_radius, enemies[j].pos, enemies[j].radius)
                    {
                        damage_enemy(
                            state,
                            registry,
                            &mut enemies[j],
                            bullet.damage * SPLASH_FRACTION,
                        );
                    }
                }
                registry.spawn_shockwave(
                    bullet.pos,
                    10.0 + bullet.radius * 0.8,
                    0.2,
                    palette::SPLASH_RING,
                );
            }

            damage_enemy(state, registry, &mut enemies[i], bullet.damage);

            if !bullet.piercing {
                bullet.dead = true;
                break;
            }
        }
    }

    registry.bullets = bullets;
    registry.enemies = enemies;
}

fn enemies_vs_players(state: &mut SimulationState, registry: &mut EntityRegistry) {
    let mut enemies = std::mem::take(&mut registry.enemies);
    let mut players = std::mem::take(&mut registry.players);

    for enemy in enemies.iter_mut() {
        if enemy.dead {
            continue;
        }
        for player in players.iter_mut() {
            if !player.alive {
                continue;
            }
            if circles_overlap(player.pos, SHIP_HIT_RADIUS, enemy.pos, enemy.radius) {
                // Ramming is mutual: the enemy always dies, the ship takes
                // its contact damage through the shield/armor pipeline.
                enemy.dead = true;
                let contact = enemy.contact_damage;
                let hit = player.pos;
                damage_player(state, registry, player, contact, hit);
                break;
            }
        }
    }

    registry.enemies = enemies;
    registry.players = players;
}

fn bolts_vs_players(state: &mut SimulationState, registry: &mut EntityRegistry) {
    let mut bolts = std::mem::take(&mut registry.enemy_bolts);
    let mut players = std::mem::take(&mut registry.players);

    for bolt in bolts.iter_mut() {
        if bolt.dead {
            continue;
        }
        for player in players.iter_mut() {
            if !player.alive {
                continue;
            }
            if circles_overlap(player.pos, SHIP_BOLT_RADIUS, bolt.pos, bolt.radius) {
                bolt.dead = true;
                let hit = bolt.pos;
                let damage = bolt.damage;
                damage_player(state, registry, player, damage, hit);
                break;
            }
        }
    }

    registry.enemy_bolts = bolts;
    registry.players = players;
}

fn pickups_vs_players(state: &mut SimulationState, registry: &mut EntityRegistry) {
    let mut pickups = std::mem::take(&mut registry.pickups);

    for pickup in pickups.iter_mut() {
        if pickup.dead {
            continue;
        }
        let grabbed = registry
            .players
            .iter()
            .position(|p| p.alive && circles_overlap(p.pos, PICKUP_GRAB_RADIUS, pickup.pos, 0.0));
        let Some(player_idx) = grabbed else {
            continue;
        };

        apply_pickup(state, registry, player_idx, pickup.payload, pickup.pos);
        pickup.dead = true;

        // Collection celebration.
        let color = pickup.color();
        let count = (registry.fx_scale() * 20.0) as usize;
        for _ in 0..count {
            let def = ParticleDef {
                color,
                size: 3.0,
                speed: 150.0,
                life: 0.8,
                additive: true,
                glow: true,
                ..Default::default()
            };
            registry.spawn_particle(pickup.pos, &def, &mut state.fx_rng);
        }
    }

    registry.pickups = pickups;
}

fn apply_pickup(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    player_idx: usize,
    payload: PickupPayload,
    _at: Vec2,
) {
    match payload {
        PickupPayload::Utility(UtilityKind::Shield) => {
            state.shield_charges = (state.shield_charges + 2).min(MAX_SHIELD_CHARGES);
            state.set_status(StatusKind::ShieldBoost, 2.0);
            state.push_sfx(Sfx::UtilityPickup);
        }
        PickupPayload::Utility(UtilityKind::Coolant) => {
            for ally in registry.players.iter_mut() {
                ally.heat = (ally.heat - 40.0).max(0.0);
            }
            state.set_status(StatusKind::TeamCoolant, 2.0);
            state.push_sfx(Sfx::UtilityPickup);
        }
        PickupPayload::Utility(UtilityKind::Overdrive) => {
            state.overdrive_timer = OVERDRIVE_DURATION;
            for ally in registry.players.iter_mut() {
                ally.heat = (ally.heat - 20.0).max(0.0);
            }
            state.set_status(StatusKind::OverdriveOnline, 2.0);
            state.push_sfx(Sfx::OverdriveStart);
            state.push_sfx(Sfx::UtilityPickup);
        }
        PickupPayload::Weapon(weapon) => {
            let player = &mut registry.players[player_idx];
            player.weapon = weapon;
            let index = player.index;
            state.set_status(
                StatusKind::WeaponSwap {
                    player: index,
                    weapon,
                },
                2.0,
            );
            state.push_sfx(Sfx::Powerup);
        }
    }
}
