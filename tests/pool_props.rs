//! Property tests for pool conservation and difficulty monotonicity.

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use void_runner::sim::{EntityRegistry, Material, difficulty_for};

#[derive(Debug, Clone, Copy)]
enum Op {
    Spawn,
    KillOldest,
    Compact,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Spawn),
        2 => Just(Op::KillOldest),
        1 => Just(Op::Compact),
    ]
}

proptest! {
    /// For any spawn/kill/compact sequence, every enemy instance is in
    /// exactly one of {live list, free list}: live + free only grows when
    /// the pool constructs a fresh instance for a spawn, and compaction
    /// moves dead entries across without losing any.
    #[test]
    fn enemy_pool_conserves_instances(ops in prop::collection::vec(op_strategy(), 1..300)) {
        let mut registry = EntityRegistry::new();
        let mut rng = Pcg32::seed_from_u64(99);
        let d = difficulty_for(2);
        let mut constructed = 0usize;

        for op in ops {
            match op {
                Op::Spawn => {
                    let reused = registry.pool_stats().enemies > 0;
                    let spawned = registry
                        .spawn_asteroid(Vec2::new(10.0, 10.0), 1, Material::Rock, &d, 2, &mut rng)
                        .is_some();
                    if spawned && !reused {
                        constructed += 1;
                    }
                }
                Op::KillOldest => {
                    if let Some(enemy) = registry.enemies.iter_mut().find(|e| !e.dead) {
                        enemy.dead = true;
                    }
                }
                Op::Compact => {
                    let total_before = registry.enemies.len() + registry.pool_stats().enemies;
                    registry.compact_all();
                    let total_after = registry.enemies.len() + registry.pool_stats().enemies;
                    prop_assert_eq!(total_before, total_after);
                    prop_assert!(registry.enemies.iter().all(|e| !e.dead));
                }
            }

            prop_assert_eq!(
                registry.enemies.len() + registry.pool_stats().enemies,
                constructed
            );
        }
    }

    /// Compaction keeps survivors in their original relative order.
    #[test]
    fn compaction_preserves_order(dead_mask in prop::collection::vec(any::<bool>(), 1..60)) {
        let mut registry = EntityRegistry::new();
        let mut rng = Pcg32::seed_from_u64(7);
        let d = difficulty_for(1);

        for (i, _) in dead_mask.iter().enumerate() {
            let enemy = registry
                .spawn_asteroid(Vec2::new(i as f32, 0.0), 1, Material::Rock, &d, 1, &mut rng)
                .unwrap();
            // Tag each entry by its spawn x so order is observable.
            enemy.vel = Vec2::ZERO;
        }
        for (enemy, &dead) in registry.enemies.iter_mut().zip(&dead_mask) {
            enemy.dead = dead;
        }

        let expected: Vec<f32> = registry
            .enemies
            .iter()
            .filter(|e| !e.dead)
            .map(|e| e.pos.x)
            .collect();
        registry.compact_all();
        let actual: Vec<f32> = registry.enemies.iter().map(|e| e.pos.x).collect();
        prop_assert_eq!(expected, actual);
    }

    /// difficulty_for(wave + 1) never softens relative to difficulty_for(wave),
    /// and the pacing floors always hold.
    #[test]
    fn difficulty_is_monotone(wave in 1u32..500) {
        let cur = difficulty_for(wave);
        let next = difficulty_for(wave + 1);

        prop_assert!(next.enemy_hp >= cur.enemy_hp);
        prop_assert!(next.enemy_speed >= cur.enemy_speed);
        prop_assert!(next.enemy_fire_rate >= cur.enemy_fire_rate);
        prop_assert!(next.enemy_bolt_speed >= cur.enemy_bolt_speed);
        prop_assert!(next.enemy_damage >= cur.enemy_damage);
        prop_assert!(next.density >= cur.density);
        prop_assert!(next.drone_cap >= cur.drone_cap);
        prop_assert!(next.spawn_interval <= cur.spawn_interval);

        prop_assert!(cur.spawn_interval >= 0.3);
        prop_assert!(cur.drone_interval >= 3.2);
        prop_assert!(cur.drone_cap <= 8);
        prop_assert!(cur.ai_lead <= 0.95);
    }
}
