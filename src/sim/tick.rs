//! Fixed-timestep simulation step
//!
//! One `step` call advances the whole simulation by exactly `SIM_DT`:
//! input application, entity kinematics, spawn directives, collision and
//! damage resolution, then compaction. Every timer in the game (fire
//! cooldowns, respawns, status line, overdrive) counts down here on the
//! same clock, so identical step sequences give identical outcomes.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::damage::finalize_game_over;
use super::difficulty::{difficulty_for, wave_for_score};
use super::entities::{EnemyKind, Material, ParticleDef, Player, ProjectileKind, palette};
use super::registry::EntityRegistry;
use super::state::{Event, Sfx, SimulationState, StatusKind, StatusLine, TickInput};
use super::weapons;
use crate::consts::*;

/// Advance the simulation by one fixed step.
pub fn step(state: &mut SimulationState, registry: &mut EntityRegistry, input: &TickInput, dt: f32) {
    if !state.running || state.game_over {
        return;
    }

    state.time_ticks += 1;

    // Impact freeze: burn whole steps, everything stays put.
    if state.hit_stop > 0 {
        state.hit_stop -= 1;
        return;
    }

    advance_wave(state);
    decay_timers(state, dt);

    update_players(state, registry, input, dt);
    update_projectiles(state, registry, dt);
    update_enemy_bolts(state, registry, dt);
    update_enemies(state, registry, dt);
    update_cosmetics(state, registry, dt);

    direct_spawns(state, registry, dt);

    collision::resolve(state, registry);
    finalize_game_over(state, registry);

    registry.compact_all();
}

/// Wave is a monotone function of score; crossing a threshold refreshes the
/// difficulty snapshot used for future spawns (never for live enemies).
fn advance_wave(state: &mut SimulationState) {
    let wave = wave_for_score(state.score);
    if wave != state.wave {
        state.wave = wave;
        state.difficulty = difficulty_for(wave);
        state.events.push(Event::WaveReached(wave));
        state.set_status(StatusKind::WaveLabel(wave), 0.0);
    }
}

fn decay_timers(state: &mut SimulationState, dt: f32) {
    if state.overdrive_timer > 0.0 {
        state.overdrive_timer = (state.overdrive_timer - dt).max(0.0);
    }

    if state.combo_timer > 0.0 {
        state.combo_timer -= dt;
        if state.combo_timer <= 0.0 {
            state.combo = (state.combo - 1.0).max(1.0);
        }
    }

    // Status line reverts on its own countdown, no deferred callbacks.
    if state.status.ttl > 0.0 {
        state.status.ttl -= dt;
        if state.status.ttl <= 0.0 {
            state.status = StatusLine {
                kind: StatusKind::Ready,
                ttl: 0.0,
            };
        }
    }

    state.shake = (state.shake - dt * 40.0).max(0.0);
}

fn update_players(
    state: &mut SimulationState,
    registry: &mut EntityRegistry,
    input: &TickInput,
    dt: f32,
) {
    let mut players = std::mem::take(&mut registry.players);

    for player in players.iter_mut() {
        let intent = input.players[player.index as usize];

        if !player.alive {
            // Frozen while down; the countdown revives only while the team
            // has lives left.
            player.respawn_timer -= dt;
            if player.respawn_timer <= 0.0 && state.team_lives > 0 {
                player.respawn(state.width, state.height);
            }
            continue;
        }

        let overdrive = state.overdrive_active();
        let speed = if overdrive {
            PLAYER_SPEED_OVERDRIVE
        } else {
            PLAYER_SPEED
        };
        let target = Vec2::new(
            intent.axis_x.clamp(-1.0, 1.0),
            intent.axis_y.clamp(-1.0, 1.0),
        ) * speed;
        player.vel += (target - player.vel) * (10.0 * dt);
        player.pos += player.vel * dt;
        player.pos.x = player.pos.x.clamp(ARENA_MARGIN, state.width - ARENA_MARGIN);
        player.pos.y = player.pos.y.clamp(ARENA_MARGIN, state.height - ARENA_MARGIN);
        player.tilt = player.vel.x / speed * 0.3;

        let cool_rate = if overdrive {
            HEAT_COOL_OVERDRIVE
        } else {
            HEAT_COOL_RATE
        };
        player.heat = (player.heat - cool_rate * dt).max(0.0);
        if player.heat < HEAT_REARM {
            player.overheated = false;
        }
        player.invuln = (player.invuln - dt).max(0.0);
        player.damage_flash = (player.damage_flash - dt * 2.4).max(0.0);
        player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);

        if intent.cycle_weapon {
            player.weapon = player.weapon.next();
            state.set_status(
                StatusKind::WeaponSwap {
                    player: player.index,
                    weapon: player.weapon,
                },
                2.0,
            );
        }

        if intent.fire && !player.overheated && player.fire_cooldown <= 0.0 {
            shoot(state, registry, player);
        }

        // Thruster exhaust.
        let thrust_chance = if player.vel.y.abs() > 10.0 { 0.7 } else { 0.4 };
        let roll = state.fx_rng.random::<f32>();
        if roll < thrust_chance {
            let (color_a, color_b) = player.engine_colors();
            let x_off = (state.fx_rng.random::<f32>() - 0.5) * 35.0;
            let glow = registry.glow_enabled();
            let def = ParticleDef {
                color: if state.fx_rng.random::<f32>() > 0.5 {
                    color_a
                } else {
                    color_b
                },
                size: state.fx_rng.random::<f32>() * 4.0 + 1.0,
                speed: 40.0,
                life: if glow { 0.4 } else { 0.24 },
                drag: 0.88,
                additive: true,
                glow,
            };
            registry.spawn_particle(
                player.pos + Vec2::new(x_off, 35.0),
                &def,
                &mut state.fx_rng,
            );
        }
    }

    registry.players = players;
}

/// Fire the equipped weapon. The shot that crosses the overheat threshold
/// still completes; the lockout applies from the next trigger pull.
fn shoot(state: &mut SimulationState, registry: &mut EntityRegistry, player: &mut Player) {
    let overdrive = state.overdrive_active();
    let heat_scale = if overdrive { OVERDRIVE_HEAT_SCALE } else { 1.0 };
    player.heat += player.weapon.heat_cost() * heat_scale;
    state.add_shake(player.weapon.shake());

    if player.heat >= HEAT_OVERHEAT {
        player.overheated = true;
        state.push_sfx(Sfx::Overheat);
        state.set_status(StatusKind::Overheated, 2.0);
    }

    let muzzle = player.pos + Vec2::new(0.0, -30.0);

    // Muzzle flash.
    let glow = registry.glow_enabled();
    let flash_count =
        (registry.fx_scale() * if overdrive { 16.0 } else { 10.0 }) as usize;
    for _ in 0..flash_count {
        let def = ParticleDef {
            color: player.weapon.color(),
            size: state.fx_rng.random::<f32>() * 5.0 + 2.0,
            speed: 180.0,
            life: if glow { 0.24 } else { 0.14 },
            additive: true,
            glow,
            ..Default::default()
        };
        registry.spawn_particle(muzzle, &def, &mut state.fx_rng);
    }

    let sfx = weapons::fire(player.weapon, muzzle, overdrive, registry, &mut state.rng);
    state.push_sfx(sfx);

    player.vel.y += player.weapon.recoil();
    let delay_scale = if overdrive { OVERDRIVE_DELAY_SCALE } else { 1.0 };
    player.fire_cooldown = player.weapon.fire_delay() * delay_scale;
}

fn update_projectiles(state: &mut SimulationState, registry: &mut EntityRegistry, dt: f32) {
    let mut bullets = std::mem::take(&mut registry.bullets);

    for bullet in bullets.iter_mut() {
        if bullet.dead {
            continue;
        }

        if bullet.kind == ProjectileKind::Missile {
            steer_missile(bullet, registry, dt);
        }
        bullet.integrate(dt, state.width);

        // Trails are cosmetic; chance per tick, budget-capped.
        let glow = registry.glow_enabled();
        match bullet.kind {
            ProjectileKind::Bullet { railgun } => {
                let chance = if glow { 0.58 } else { 0.32 };
                if state.fx_rng.random::<f32>() < chance {
                    let def = ParticleDef {
                        color: bullet.color,
                        size: bullet.radius * 0.72,
                        speed: 36.0,
                        life: if glow { 0.28 } else { 0.18 },
                        additive: true,
                        glow,
                        ..Default::default()
                    };
                    registry.spawn_particle(bullet.pos, &def, &mut state.fx_rng);
                }
                if railgun {
                    let chance = if glow { 0.6 } else { 0.35 };
                    if state.fx_rng.random::<f32>() < chance {
                        let jitter = (state.fx_rng.random::<f32>() - 0.5) * 15.0;
                        let def = ParticleDef {
                            color: bullet.color,
                            size: bullet.radius * 1.05,
                            speed: 10.0,
                            life: if glow { 0.42 } else { 0.26 },
                            additive: true,
                            glow,
                            ..Default::default()
                        };
                        registry.spawn_particle(
                            bullet.pos + Vec2::new(jitter, 0.0),
                            &def,
                            &mut state.fx_rng,
                        );
                    }
                }
            }
            ProjectileKind::Missile => {
                let chance = if glow { 0.55 } else { 0.35 };
                if state.fx_rng.random::<f32>() < chance {
                    let def = ParticleDef {
                        color: bullet.color,
                        size: 4.0,
                        speed: 38.0,
                        life: if glow { 0.62 } else { 0.34 },
                        additive: true,
                        glow,
                        ..Default::default()
                    };
                    registry.spawn_particle(bullet.pos, &def, &mut state.fx_rng);
                }
            }
        }
    }

    registry.bullets = bullets;
}

/// Home on the nearest live enemy within acquisition range. The target is
/// re-acquired every step so compaction can never dangle a reference.
fn steer_missile(
    missile: &mut super::entities::Projectile,
    registry: &EntityRegistry,
    dt: f32,
) {
    const ACQUIRE_RANGE: f32 = 400.0;
    const TURN_ACCEL: f32 = 800.0;
    const MAX_SPEED: f32 = 920.0;

    let mut nearest: Option<Vec2> = None;
    let mut best = ACQUIRE_RANGE * ACQUIRE_RANGE;
    for enemy in registry.enemies.iter().filter(|e| !e.dead) {
        let d = enemy.pos.distance_squared(missile.pos);
        if d < best {
            best = d;
            nearest = Some(enemy.pos);
        }
    }

    if let Some(target) = nearest {
        let angle = (target.y - missile.pos.y).atan2(target.x - missile.pos.x);
        missile.vel += Vec2::new(angle.cos(), angle.sin()) * TURN_ACCEL * dt;
        let speed = missile.vel.length();
        if speed > MAX_SPEED {
            missile.vel *= MAX_SPEED / speed;
        }
    }
}

fn update_enemy_bolts(state: &mut SimulationState, registry: &mut EntityRegistry, dt: f32) {
    let mut bolts = std::mem::take(&mut registry.enemy_bolts);

    for bolt in bolts.iter_mut() {
        if bolt.dead {
            continue;
        }
        bolt.integrate(dt, state.width, state.height);

        let glow = registry.glow_enabled();
        let chance = if glow { 0.4 } else { 0.2 };
        if state.fx_rng.random::<f32>() < chance {
            let def = ParticleDef {
                color: palette::BOLT_TRAIL,
                size: 2.4,
                speed: 18.0,
                life: 0.22,
                additive: true,
                glow,
                ..Default::default()
            };
            registry.spawn_particle(bolt.pos, &def, &mut state.fx_rng);
        }
    }

    registry.enemy_bolts = bolts;
}

fn update_enemies(state: &mut SimulationState, registry: &mut EntityRegistry, dt: f32) {
    let mut enemies = std::mem::take(&mut registry.enemies);

    for enemy in enemies.iter_mut() {
        if enemy.dead {
            continue;
        }

        match &mut enemy.kind {
            EnemyKind::Asteroid { rot_speed, .. } => {
                enemy.pos += enemy.vel * dt;
                enemy.rot += *rot_speed * dt;
                if enemy.pos.y > state.height + 150.0 {
                    enemy.dead = true;
                }
            }
            EnemyKind::Drone {
                sway,
                fire_cooldown,
                refire_base,
                refire_scale,
                shot_damage,
                bolt_speed,
                bolt_radius,
                ai_lead,
                steer_gain,
                max_strafe,
            } => {
                *sway += dt * 2.4;

                // Strafe toward where the target is heading.
                if let Some(target) = registry.closest_alive_player(enemy.pos) {
                    let lead_time = 0.18 + *ai_lead * 0.34;
                    let projected_x = target.pos.x + target.vel.x * lead_time;
                    let steer = ((projected_x - enemy.pos.x) / 200.0).clamp(-1.0, 1.0);
                    enemy.vel.x += steer * *steer_gain * *ai_lead * dt;
                    enemy.vel.x = enemy.vel.x.clamp(-*max_strafe, *max_strafe);
                }

                enemy.pos.x += enemy.vel.x * dt;
                enemy.pos.y += (enemy.vel.y + sway.sin() * 30.0) * dt;

                if enemy.pos.x < enemy.radius || enemy.pos.x > state.width - enemy.radius {
                    enemy.vel.x = -enemy.vel.x;
                    enemy.pos.x = enemy.pos.x.clamp(enemy.radius, state.width - enemy.radius);
                }

                *fire_cooldown -= dt;
                if *fire_cooldown <= 0.0 {
                    let nozzle = enemy.pos + Vec2::new(0.0, 10.0);
                    let lead_time = 0.2 + *ai_lead * 0.35;
                    let aim = registry
                        .closest_alive_player(nozzle)
                        .map(|p| p.pos + p.vel * lead_time);
                    if let Some(aim) = aim {
                        registry.spawn_enemy_bolt(
                            nozzle,
                            aim,
                            *bolt_speed,
                            *bolt_radius,
                            *shot_damage,
                        );
                        state.push_sfx(Sfx::EnemyShot);
                    }
                    *fire_cooldown =
                        (*refire_base + state.rng.random::<f32>() * 0.9) / *refire_scale;
                }

                if enemy.pos.y > state.height + 100.0 {
                    enemy.dead = true;
                }
            }
        }

        enemy.flash = (enemy.flash - dt * 4.0).max(0.0);
    }

    registry.enemies = enemies;
}

fn update_cosmetics(state: &mut SimulationState, registry: &mut EntityRegistry, dt: f32) {
    for pickup in registry.pickups.iter_mut() {
        pickup.update(dt, state.height);
    }
    for particle in registry.particles.iter_mut() {
        particle.update(dt);
    }
    for wave in registry.shockwaves.iter_mut() {
        wave.update(dt);
    }
    for overlay in registry.overlays.iter_mut() {
        overlay.update(dt);
    }
}

/// Spawn directives from the difficulty director: asteroid bursts on a
/// score-tightened cadence, drones gated by wave and cap.
fn direct_spawns(state: &mut SimulationState, registry: &mut EntityRegistry, dt: f32) {
    let d = state.difficulty;

    state.spawn_timer += dt;
    let interval =
        (d.spawn_interval - (state.score / SPAWN_SCORE_SCALE) as f32).max(SPAWN_INTERVAL_FLOOR);
    if state.spawn_timer > interval {
        state.spawn_timer = 0.0;

        let burst_base = 1 + ((d.density - 1.0).max(0.0) * 1.35).floor() as u32;
        let extra_chance = (d.density - burst_base as f32).max(0.0);
        let extra = if state.rng.random::<f32>() < extra_chance {
            1
        } else {
            0
        };

        for _ in 0..burst_base + extra {
            let size_roll = state.rng.random::<f32>();
            let large_bias = (state.wave.saturating_sub(2) as f32 * 0.03).min(0.26);
            let medium_bias = (state.wave as f32 * 0.02).min(0.18);
            let small_threshold = (0.58 - medium_bias - large_bias * 0.6).max(0.28);
            let medium_threshold = (0.9 - large_bias).max(small_threshold + 0.12);
            let size_class = if size_roll < small_threshold {
                1
            } else if size_roll < medium_threshold {
                2
            } else {
                3
            };

            let type_roll = state.rng.random::<f32>();
            let metal_boost = (state.wave.saturating_sub(2) as f32 * 0.025).min(0.22);
            let crystal_boost = (state.wave as f32 * 0.015).min(0.16);
            let material = if type_roll > 0.78 - metal_boost {
                Material::Metal
            } else if type_roll > 0.54 - crystal_boost {
                Material::Crystal
            } else {
                Material::Rock
            };

            let pos = Vec2::new(
                state.rng.random::<f32>() * state.width,
                -80.0 - state.rng.random::<f32>() * 50.0,
            );
            registry.spawn_asteroid(pos, size_class, material, &d, state.wave, &mut state.rng);
        }
    }

    state.drone_timer += dt;
    let drone_rate = d.drone_interval.max(DRONE_INTERVAL_FLOOR);
    if state.drone_timer > drone_rate && state.wave >= 2 {
        state.drone_timer = 0.0;
        if registry.drone_count() < d.drone_cap as usize {
            let side = if state.rng.random::<f32>() < 0.5 {
                -40.0
            } else {
                state.width + 40.0
            };
            let y = 90.0 + state.rng.random::<f32>() * (state.height * 0.3);
            registry.spawn_drone(Vec2::new(side, y), &d, state.wave, &mut state.rng);
        }
    }
}
