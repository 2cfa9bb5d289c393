//! End-to-end gameplay scenarios through the public simulation surface.

use glam::Vec2;
use void_runner::consts::*;
use void_runner::sim::{
    EntityRegistry, Material, PlayerMode, RegistryCaps, Simulation, TickInput, difficulty_for,
};

fn new_sim(seed: u64) -> Simulation {
    let mut sim = Simulation::new(seed, PlayerMode::Solo);
    sim.start();
    sim
}

#[test]
fn basic_kill_scores_and_recycles() {
    let mut sim = new_sim(7);
    let d = difficulty_for(1);

    // A wave-1 small rock has 2 hp; one blaster bolt (2.8 damage) kills it.
    let spot = Vec2::new(400.0, 300.0);
    sim.registry
        .spawn_asteroid(spot, 1, Material::Rock, &d, 1, &mut sim.state.rng)
        .unwrap();
    assert_eq!(sim.registry.enemies[0].hp, 2.0);
    sim.registry
        .spawn_bullet(spot, Vec2::ZERO, 2.8, 7.0, 0x00f3ff, false, false)
        .unwrap();

    let free_before = sim.registry.pool_stats().enemies;
    sim.step(&TickInput::default());

    // Killed, scored at the bumped combo, and compacted back to its pool.
    assert_eq!(sim.registry.enemies.len(), 0);
    assert_eq!(sim.registry.pool_stats().enemies, free_before + 1);
    assert_eq!(sim.state.kills, 1);
    assert!((sim.state.score - 150.0 * 1.25).abs() < 1e-6);
}

#[test]
fn shield_absorbs_contact_damage() {
    let mut sim = new_sim(11);
    let d = difficulty_for(1);
    sim.state.shield_charges = 3;
    sim.registry.players[0].invuln = 0.0;

    // Wave-1 small rock: contact damage 36 * 0.78 = 28.08.
    let ship_pos = sim.registry.players[0].pos;
    sim.registry
        .spawn_asteroid(ship_pos, 1, Material::Rock, &d, 1, &mut sim.state.rng)
        .unwrap();
    // Pin it on the ship so the ram lands this step.
    sim.registry.enemies[0].vel = Vec2::ZERO;

    sim.step(&TickInput::default());

    // One charge burned; 28.08 * 0.45 = 12.636 passes the absorb threshold,
    // armor takes it to 12.636 * 0.58 = 7.329.
    assert_eq!(sim.state.shield_charges, 2);
    let hp = sim.registry.players[0].hp;
    assert!((hp - (PLAYER_MAX_HP - 7.329)).abs() < 0.05, "hp was {hp}");
    assert!(sim.registry.players[0].invuln > 0.0);
}

#[test]
fn hits_during_invulnerability_are_ignored() {
    let mut sim = new_sim(13);
    let d = difficulty_for(1);
    sim.registry.players[0].invuln = 5.0;
    let shield_before = sim.state.shield_charges;

    let ship_pos = sim.registry.players[0].pos;
    sim.registry
        .spawn_asteroid(ship_pos, 3, Material::Metal, &d, 1, &mut sim.state.rng)
        .unwrap();
    sim.registry.enemies[0].vel = Vec2::ZERO;

    sim.step(&TickInput::default());

    assert_eq!(sim.registry.players[0].hp, PLAYER_MAX_HP);
    assert_eq!(sim.state.shield_charges, shield_before);
}

#[test]
fn elimination_then_respawn_with_lives_left() {
    let mut sim = new_sim(17);
    let d = difficulty_for(1);
    sim.state.team_lives = 2;
    sim.state.shield_charges = 0;
    sim.registry.players[0].invuln = 0.0;
    sim.registry.players[0].hp = 1.0;

    let ship_pos = sim.registry.players[0].pos;
    sim.registry
        .spawn_asteroid(ship_pos, 3, Material::Metal, &d, 1, &mut sim.state.rng)
        .unwrap();
    sim.registry.enemies[0].vel = Vec2::ZERO;

    sim.step(&TickInput::default());

    assert!(!sim.registry.players[0].alive);
    assert_eq!(sim.registry.players[0].hp, 0.0);
    assert_eq!(sim.state.team_lives, 1);
    assert_eq!(sim.registry.players[0].respawn_timer, RESPAWN_DELAY);

    // While down the ship is frozen and skipped by collision; the countdown
    // revives it at full health.
    let steps = (RESPAWN_DELAY / SIM_DT).ceil() as usize + 2;
    for _ in 0..steps {
        sim.step(&TickInput::default());
    }
    assert!(sim.registry.players[0].alive);
    assert_eq!(sim.registry.players[0].hp, PLAYER_MAX_HP);
    assert!(sim.registry.players[0].invuln > 0.0);
}

#[test]
fn last_life_ends_the_run() {
    let mut sim = new_sim(19);
    let d = difficulty_for(1);
    sim.state.team_lives = 1;
    sim.state.shield_charges = 0;
    sim.registry.players[0].invuln = 0.0;
    sim.registry.players[0].hp = 1.0;

    let ship_pos = sim.registry.players[0].pos;
    sim.registry
        .spawn_asteroid(ship_pos, 3, Material::Metal, &d, 1, &mut sim.state.rng)
        .unwrap();
    sim.registry.enemies[0].vel = Vec2::ZERO;

    sim.step(&TickInput::default());

    assert_eq!(sim.state.team_lives, 0);
    assert!(sim.state.game_over);
    assert!(!sim.state.running);

    // Terminal: further steps are no-ops.
    let ticks = sim.state.time_ticks;
    sim.step(&TickInput::default());
    assert_eq!(sim.state.time_ticks, ticks);
}

#[test]
fn enemy_ceiling_refuses_further_spawns() {
    let mut reg = EntityRegistry::with_caps(RegistryCaps {
        enemies: 8,
        ..Default::default()
    });
    let d = difficulty_for(3);
    let mut rng = rand_pcg::Pcg32::new(1, 1);

    for _ in 0..8 {
        assert!(
            reg.spawn_asteroid(Vec2::new(100.0, -80.0), 2, Material::Rock, &d, 3, &mut rng)
                .is_some()
        );
    }
    assert!(
        reg.spawn_asteroid(Vec2::new(100.0, -80.0), 2, Material::Rock, &d, 3, &mut rng)
            .is_none()
    );
    assert!(
        reg.spawn_drone(Vec2::new(-40.0, 120.0), &d, 3, &mut rng)
            .is_none()
    );
    assert_eq!(reg.enemies.len(), 8);
}

#[test]
fn long_session_stays_within_ceilings() {
    let mut sim = new_sim(23);
    let mut input = TickInput::default();
    input.players[0].fire = true;

    // Two simulated minutes of constant combat.
    for step_idx in 0..(120.0 / SIM_DT) as usize {
        input.players[0].axis_x = ((step_idx as f32) * 0.01).sin();
        sim.step(&input);

        let counts = sim.registry.live_counts();
        assert!(counts.enemies <= MAX_ENEMIES);
        assert!(counts.bullets <= MAX_BULLETS);
        assert!(counts.enemy_bolts <= MAX_ENEMY_BOLTS);
        assert!(counts.particles <= MAX_PARTICLES);
        assert!(counts.shockwaves <= MAX_SHOCKWAVES);
        assert!(counts.overlays <= MAX_OVERLAYS);

        if sim.state.game_over {
            break;
        }
    }
}
