//! Entity registry: the single source of truth for what currently exists
//!
//! Owns every live collection and the pool behind each one. Spawns go
//! through admission control (a kind at its ceiling refuses the spawn, no
//! side effects), and the end-of-step compaction pass here is the only
//! place pool populations change during steady-state play.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::entities::{
    Enemy, EnemyBolt, Material, OverlayFlash, Particle, ParticleDef, Pickup, PickupPayload, Player,
    Projectile, Shockwave, palette,
};
use super::pool::{ObjectPool, compact};
use super::state::{Sfx, SimulationState};
use super::weapons::WeaponKind;
use crate::consts::*;

/// Per-kind live ceilings. Admission control, not error conditions.
#[derive(Debug, Clone, Copy)]
pub struct RegistryCaps {
    pub bullets: usize,
    pub enemy_bolts: usize,
    pub enemies: usize,
    pub pickups: usize,
    pub particles: usize,
    pub shockwaves: usize,
    pub overlays: usize,
}

impl Default for RegistryCaps {
    fn default() -> Self {
        Self {
            bullets: MAX_BULLETS,
            enemy_bolts: MAX_ENEMY_BOLTS,
            enemies: MAX_ENEMIES,
            pickups: MAX_PICKUPS,
            particles: MAX_PARTICLES,
            shockwaves: MAX_SHOCKWAVES,
            overlays: MAX_OVERLAYS,
        }
    }
}

/// Free-list ceilings are looser than live ceilings so a burst can be
/// fully recycled, but a population spike never pins memory forever.
struct Pools {
    bullets: ObjectPool<Projectile>,
    enemy_bolts: ObjectPool<EnemyBolt>,
    enemies: ObjectPool<Enemy>,
    pickups: ObjectPool<Pickup>,
    particles: ObjectPool<Particle>,
    shockwaves: ObjectPool<Shockwave>,
    overlays: ObjectPool<OverlayFlash>,
}

impl Default for Pools {
    fn default() -> Self {
        Self {
            bullets: ObjectPool::new(1400),
            enemy_bolts: ObjectPool::new(900),
            enemies: ObjectPool::new(520),
            pickups: ObjectPool::new(180),
            particles: ObjectPool::new(2800),
            shockwaves: ObjectPool::new(180),
            overlays: ObjectPool::new(64),
        }
    }
}

/// Live-entity counts, exposed for the HUD/debug overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveCounts {
    pub bullets: usize,
    pub enemy_bolts: usize,
    pub enemies: usize,
    pub pickups: usize,
    pub particles: usize,
    pub shockwaves: usize,
    pub overlays: usize,
}

/// Free-list sizes, exposed for pool-conservation tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub bullets: usize,
    pub enemy_bolts: usize,
    pub enemies: usize,
    pub pickups: usize,
    pub particles: usize,
    pub shockwaves: usize,
    pub overlays: usize,
}

pub struct EntityRegistry {
    pub players: Vec<Player>,
    pub bullets: Vec<Projectile>,
    pub enemy_bolts: Vec<EnemyBolt>,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    pub shockwaves: Vec<Shockwave>,
    pub overlays: Vec<OverlayFlash>,
    caps: RegistryCaps,
    /// Runtime particle ceiling; shrinks in reduced-quality mode
    particle_budget: usize,
    /// Cosmetic burst-count multiplier from the quality controller
    fx_scale: f32,
    glow_enabled: bool,
    pools: Pools,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::with_caps(RegistryCaps::default())
    }

    pub fn with_caps(caps: RegistryCaps) -> Self {
        Self {
            players: Vec::new(),
            bullets: Vec::new(),
            enemy_bolts: Vec::new(),
            enemies: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            shockwaves: Vec::new(),
            overlays: Vec::new(),
            caps,
            particle_budget: caps.particles,
            fx_scale: 1.0,
            glow_enabled: true,
            pools: Pools::default(),
        }
    }

    /// Release every live entity back to its pool and rebuild the player
    /// roster for a fresh run.
    pub fn reset_run(&mut self, player_count: usize, arena_w: f32, arena_h: f32) {
        for e in self.bullets.drain(..) {
            self.pools.bullets.release(e);
        }
        for e in self.enemy_bolts.drain(..) {
            self.pools.enemy_bolts.release(e);
        }
        for e in self.enemies.drain(..) {
            self.pools.enemies.release(e);
        }
        for e in self.pickups.drain(..) {
            self.pools.pickups.release(e);
        }
        for e in self.particles.drain(..) {
            self.pools.particles.release(e);
        }
        for e in self.shockwaves.drain(..) {
            self.pools.shockwaves.release(e);
        }
        for e in self.overlays.drain(..) {
            self.pools.overlays.release(e);
        }

        self.players.clear();
        for index in 0..player_count.min(2) {
            self.players.push(Player::new(index as u8, arena_w, arena_h));
        }
    }

    /// Apply a quality-controller decision: shrink or restore the particle
    /// budget and cosmetic burst scale. Gameplay collections are untouched.
    pub fn set_quality(&mut self, particle_budget: usize, fx_scale: f32, glow: bool) {
        self.particle_budget = particle_budget.min(self.caps.particles);
        self.fx_scale = fx_scale;
        self.glow_enabled = glow;
    }

    pub fn fx_scale(&self) -> f32 {
        self.fx_scale
    }

    pub fn glow_enabled(&self) -> bool {
        self.glow_enabled
    }

    // -- spawns (admission-controlled) ------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub fn spawn_bullet(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        damage: f32,
        radius: f32,
        color: u32,
        piercing: bool,
        railgun: bool,
    ) -> Option<&mut Projectile> {
        if self.bullets.len() >= self.caps.bullets {
            return None;
        }
        let mut bullet = self.pools.bullets.acquire();
        bullet.reset_bullet(pos, vel, damage, radius, color, piercing, railgun);
        self.bullets.push(bullet);
        self.bullets.last_mut()
    }

    pub fn spawn_missile(
        &mut self,
        pos: Vec2,
        color: u32,
        damage: f32,
        rng: &mut Pcg32,
    ) -> Option<&mut Projectile> {
        if self.bullets.len() >= self.caps.bullets {
            return None;
        }
        let mut missile = self.pools.bullets.acquire();
        missile.reset_missile(pos, color, damage, rng);
        self.bullets.push(missile);
        self.bullets.last_mut()
    }

    pub fn spawn_enemy_bolt(
        &mut self,
        pos: Vec2,
        target: Vec2,
        speed: f32,
        radius: f32,
        damage: f32,
    ) -> Option<&mut EnemyBolt> {
        if self.enemy_bolts.len() >= self.caps.enemy_bolts {
            return None;
        }
        let mut bolt = self.pools.enemy_bolts.acquire();
        bolt.reset(pos, target, speed, radius, damage);
        self.enemy_bolts.push(bolt);
        self.enemy_bolts.last_mut()
    }

    pub fn spawn_asteroid(
        &mut self,
        pos: Vec2,
        size_class: u8,
        material: Material,
        difficulty: &Difficulty,
        wave: u32,
        rng: &mut Pcg32,
    ) -> Option<&mut Enemy> {
        if self.enemies.len() >= self.caps.enemies {
            return None;
        }
        let mut enemy = self.pools.enemies.acquire();
        enemy.reset_asteroid(pos, size_class, material, difficulty, wave, rng);
        self.enemies.push(enemy);
        self.enemies.last_mut()
    }

    pub fn spawn_drone(
        &mut self,
        pos: Vec2,
        difficulty: &Difficulty,
        wave: u32,
        rng: &mut Pcg32,
    ) -> Option<&mut Enemy> {
        if self.enemies.len() >= self.caps.enemies {
            return None;
        }
        let mut enemy = self.pools.enemies.acquire();
        enemy.reset_drone(pos, difficulty, wave, rng);
        self.enemies.push(enemy);
        self.enemies.last_mut()
    }

    pub fn spawn_pickup(&mut self, pos: Vec2, payload: PickupPayload) -> Option<&mut Pickup> {
        if self.pickups.len() >= self.caps.pickups {
            return None;
        }
        let mut pickup = self.pools.pickups.acquire();
        pickup.reset(pos, payload);
        self.pickups.push(pickup);
        self.pickups.last_mut()
    }

    pub fn spawn_particle(
        &mut self,
        pos: Vec2,
        def: &ParticleDef,
        rng: &mut Pcg32,
    ) -> Option<&mut Particle> {
        if self.particles.len() >= self.particle_budget {
            return None;
        }
        let mut particle = self.pools.particles.acquire();
        particle.reset(pos, def, rng);
        self.particles.push(particle);
        self.particles.last_mut()
    }

    pub fn spawn_shockwave(
        &mut self,
        pos: Vec2,
        radius: f32,
        life: f32,
        color: u32,
    ) -> Option<&mut Shockwave> {
        if self.shockwaves.len() >= self.caps.shockwaves {
            return None;
        }
        let mut wave = self.pools.shockwaves.acquire();
        wave.reset(pos, radius, life, color);
        self.shockwaves.push(wave);
        self.shockwaves.last_mut()
    }

    pub fn spawn_overlay(&mut self, duration: f32, color: u32) -> Option<&mut OverlayFlash> {
        if self.overlays.len() >= self.caps.overlays {
            return None;
        }
        let mut overlay = self.pools.overlays.acquire();
        overlay.reset(duration, color);
        self.overlays.push(overlay);
        self.overlays.last_mut()
    }

    // -- composite cosmetic bursts ----------------------------------------

    /// Small spark burst at an impact point.
    pub fn spawn_impact(&mut self, state: &mut SimulationState, pos: Vec2, color: u32, scale: f32) {
        let count = (self.fx_scale * (8.0 + scale * 6.0)) as usize;
        for _ in 0..count {
            let def = ParticleDef {
                color,
                size: state.fx_rng.random::<f32>() * 3.6 + 1.6 * scale,
                speed: 110.0 + state.fx_rng.random::<f32>() * 140.0 * scale,
                life: 0.28 + state.fx_rng.random::<f32>() * 0.25,
                drag: 0.9,
                additive: true,
                glow: self.glow_enabled,
            };
            self.spawn_particle(pos, &def, &mut state.fx_rng);
        }
        if scale > 1.1 {
            self.spawn_shockwave(pos, 12.0 * scale, 0.22 + scale * 0.05, palette::WHITE);
        }
    }

    /// Full explosion: burst + debris particles, double shockwave, screen
    /// flash, shake and the boom.
    pub fn spawn_explosion(
        &mut self,
        state: &mut SimulationState,
        pos: Vec2,
        intensity: f32,
        colors: &[u32],
    ) {
        let burst_count = ((30.0 + intensity * 20.0) * self.fx_scale) as usize;
        let debris_count = ((18.0 + intensity * 18.0) * self.fx_scale) as usize;
        for _ in 0..burst_count {
            let color = colors[state.fx_rng.random_range(0..colors.len())];
            let def = ParticleDef {
                color,
                size: state.fx_rng.random::<f32>() * (4.2 + intensity * 2.8) + 2.0,
                speed: 220.0 + state.fx_rng.random::<f32>() * (220.0 + intensity * 90.0),
                life: 0.65 + state.fx_rng.random::<f32>() * 0.8 + intensity * 0.15,
                drag: 0.9,
                additive: true,
                glow: self.glow_enabled,
            };
            self.spawn_particle(pos, &def, &mut state.fx_rng);
        }
        for _ in 0..debris_count {
            let color = colors[state.fx_rng.random_range(0..colors.len())];
            let def = ParticleDef {
                color,
                size: state.fx_rng.random::<f32>() * 3.2 + 1.4,
                speed: 160.0 + state.fx_rng.random::<f32>() * (180.0 + intensity * 80.0),
                life: 0.75 + state.fx_rng.random::<f32>() * 0.9,
                drag: 0.94,
                additive: false,
                glow: false,
            };
            self.spawn_particle(pos, &def, &mut state.fx_rng);
        }
        self.spawn_shockwave(
            pos,
            24.0 + intensity * 14.0,
            0.35 + intensity * 0.11,
            palette::SHOCK_WARM,
        );
        self.spawn_shockwave(
            pos,
            16.0 + intensity * 10.0,
            0.25 + intensity * 0.08,
            palette::SHOCK_COOL,
        );
        self.spawn_overlay(0.1 + intensity * 0.07, palette::OVERLAY_BLAST);
        state.add_shake(6.0 + intensity * 7.0);
        state.push_sfx(Sfx::BigExplosion { intensity });
    }

    // -- queries -----------------------------------------------------------

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn closest_alive_player(&self, from: Vec2) -> Option<&Player> {
        self.alive_players().min_by(|a, b| {
            let da = a.pos.distance_squared(from);
            let db = b.pos.distance_squared(from);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn drone_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_drone()).count()
    }

    pub fn live_counts(&self) -> LiveCounts {
        LiveCounts {
            bullets: self.bullets.len(),
            enemy_bolts: self.enemy_bolts.len(),
            enemies: self.enemies.len(),
            pickups: self.pickups.len(),
            particles: self.particles.len(),
            shockwaves: self.shockwaves.len(),
            overlays: self.overlays.len(),
        }
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            bullets: self.pools.bullets.free_count(),
            enemy_bolts: self.pools.enemy_bolts.free_count(),
            enemies: self.pools.enemies.free_count(),
            pickups: self.pools.pickups.free_count(),
            particles: self.pools.particles.free_count(),
            shockwaves: self.pools.shockwaves.free_count(),
            overlays: self.pools.overlays.free_count(),
        }
    }

    /// End-of-step compaction: the only place dead entities physically
    /// leave their live arrays and return to the pools.
    pub fn compact_all(&mut self) {
        compact(&mut self.bullets, &mut self.pools.bullets);
        compact(&mut self.enemy_bolts, &mut self.pools.enemy_bolts);
        compact(&mut self.enemies, &mut self.pools.enemies);
        compact(&mut self.pickups, &mut self.pools.pickups);
        compact(&mut self.particles, &mut self.pools.particles);
        compact(&mut self.shockwaves, &mut self.pools.shockwaves);
        compact(&mut self.overlays, &mut self.pools.overlays);
    }
}

/// Weapon-pickup helper used by drop rolls; kept here so the drop table and
/// the admission path stay together.
pub fn random_weapon(rng: &mut Pcg32) -> WeaponKind {
    WeaponKind::ALL[rng.random_range(0..WeaponKind::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(5)
    }

    fn d1() -> Difficulty {
        crate::sim::difficulty::difficulty_for(1)
    }

    #[test]
    fn spawn_at_ceiling_is_refused() {
        let mut reg = EntityRegistry::with_caps(RegistryCaps {
            enemies: 3,
            ..Default::default()
        });
        let mut rng = rng();
        for _ in 0..3 {
            assert!(
                reg.spawn_asteroid(Vec2::ZERO, 1, Material::Rock, &d1(), 1, &mut rng)
                    .is_some()
            );
        }
        assert!(
            reg.spawn_asteroid(Vec2::ZERO, 1, Material::Rock, &d1(), 1, &mut rng)
                .is_none()
        );
        assert_eq!(reg.enemies.len(), 3);
    }

    #[test]
    fn compact_returns_dead_enemies_to_pool() {
        let mut reg = EntityRegistry::new();
        let mut rng = rng();
        for _ in 0..4 {
            reg.spawn_asteroid(Vec2::ZERO, 1, Material::Rock, &d1(), 1, &mut rng);
        }
        reg.enemies[1].dead = true;
        reg.enemies[3].dead = true;

        let free_before = reg.pool_stats().enemies;
        reg.compact_all();
        assert_eq!(reg.enemies.len(), 2);
        assert_eq!(reg.pool_stats().enemies, free_before + 2);
    }

    #[test]
    fn spawn_reuses_pooled_instances() {
        let mut reg = EntityRegistry::new();
        let mut rng = rng();
        reg.spawn_asteroid(Vec2::ZERO, 3, Material::Metal, &d1(), 1, &mut rng);
        reg.enemies[0].dead = true;
        reg.compact_all();
        assert_eq!(reg.pool_stats().enemies, 1);

        reg.spawn_asteroid(Vec2::ZERO, 1, Material::Rock, &d1(), 1, &mut rng);
        assert_eq!(reg.pool_stats().enemies, 0);
        // The recycled instance was fully reset.
        assert!(!reg.enemies[0].dead);
        assert_eq!(reg.enemies[0].radius, 15.0);
    }

    #[test]
    fn particle_budget_shrinks_with_quality() {
        let mut reg = EntityRegistry::new();
        let mut rng = rng();
        reg.set_quality(2, 0.56, false);
        for _ in 0..5 {
            reg.spawn_particle(Vec2::ZERO, &ParticleDef::default(), &mut rng);
        }
        assert_eq!(reg.particles.len(), 2);
    }

    #[test]
    fn closest_player_skips_eliminated_ships() {
        let mut reg = EntityRegistry::new();
        reg.reset_run(2, 1600.0, 900.0);
        reg.players[0].pos = Vec2::new(100.0, 100.0);
        reg.players[1].pos = Vec2::new(900.0, 100.0);
        reg.players[0].alive = false;

        let closest = reg.closest_alive_player(Vec2::new(110.0, 100.0)).unwrap();
        assert_eq!(closest.index, 1);
    }
}
