//! Entity types for the simulation
//!
//! Every gameplay entity shares the same minimal shape: position, velocity
//! and a dead flag, plus a kind tag where a collection holds variants
//! (asteroids vs drones, bullets vs missiles). Variants are dispatched with
//! an explicit `match` so pooling stays type-homogeneous per collection.
//!
//! Destruction is two-phase: updates and collision only set `dead`; the
//! registry's compaction pass physically removes entries and returns them
//! to their pools.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::pool::Recyclable;
use super::weapons::WeaponKind;
use crate::consts::*;

/// Render tint tags, packed 0xRRGGBB. The renderer maps these to its own
/// color space; the core only records what exists.
pub mod palette {
    pub const WHITE: u32 = 0xffffff;
    pub const ENGINE_P1: u32 = 0x00f3ff;
    pub const ENGINE_P1_ALT: u32 = 0x4d9eff;
    pub const ENGINE_P2: u32 = 0xff5ef2;
    pub const ENGINE_P2_ALT: u32 = 0xff9a66;
    pub const ENEMY_BOLT: u32 = 0xff6077;
    pub const BOLT_TRAIL: u32 = 0xff6d88;
    pub const DRONE_HIT: u32 = 0x8fb7de;
    pub const SPLASH_RING: u32 = 0xffeca0;
    pub const SHOCK_WARM: u32 = 0xffe7b4;
    pub const SHOCK_COOL: u32 = 0x8cdcff;
    pub const OVERLAY_BLAST: u32 = 0xffbe78;
    pub const SHIELD_P1: u32 = 0x87e3ff;
    pub const SHIELD_P2: u32 = 0xff9af3;
    pub const HULL_P1: u32 = 0x74d9ff;
    pub const HULL_P2: u32 = 0xff7ae9;
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One player ship. Not pooled: at most two exist per run.
#[derive(Debug, Clone)]
pub struct Player {
    pub index: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub alive: bool,
    pub hp: f32,
    pub max_hp: f32,
    /// Fraction of post-shield damage soaked by the hull plating
    pub armor: f32,
    pub weapon: WeaponKind,
    /// Weapon thermal budget; firing locks out at `HEAT_OVERHEAT`
    pub heat: f32,
    pub overheated: bool,
    /// Seconds until the weapon may fire again (fixed-step clock)
    pub fire_cooldown: f32,
    /// Fresh hits are ignored while this is positive
    pub invuln: f32,
    /// Counts down to automatic revival while team lives remain
    pub respawn_timer: f32,
    /// Render-facing: red flash intensity, decays per step
    pub damage_flash: f32,
    /// Render-facing: banking angle from lateral velocity
    pub tilt: f32,
}

impl Player {
    pub fn new(index: u8, arena_w: f32, arena_h: f32) -> Self {
        Self {
            index,
            pos: Self::spawn_pos(index, arena_w, arena_h),
            vel: Vec2::ZERO,
            alive: true,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            armor: PLAYER_ARMOR,
            weapon: if index == 0 {
                WeaponKind::Blaster
            } else {
                WeaponKind::Laser
            },
            heat: 0.0,
            overheated: false,
            fire_cooldown: 0.0,
            invuln: SPAWN_INVULN,
            respawn_timer: 0.0,
            damage_flash: 0.0,
            tilt: 0.0,
        }
    }

    pub fn spawn_pos(index: u8, arena_w: f32, arena_h: f32) -> Vec2 {
        let x = arena_w * if index == 0 { 0.36 } else { 0.64 };
        Vec2::new(x, arena_h - 120.0)
    }

    /// Revive at the spawn point with a grace window.
    pub fn respawn(&mut self, arena_w: f32, arena_h: f32) {
        self.alive = true;
        self.invuln = RESPAWN_INVULN;
        self.heat = 0.0;
        self.overheated = false;
        self.hp = self.max_hp;
        self.damage_flash = 0.0;
        self.vel = Vec2::ZERO;
        self.pos = Self::spawn_pos(self.index, arena_w, arena_h);
    }

    pub fn engine_colors(&self) -> (u32, u32) {
        if self.index == 0 {
            (palette::ENGINE_P1, palette::ENGINE_P1_ALT)
        } else {
            (palette::ENGINE_P2, palette::ENGINE_P2_ALT)
        }
    }
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

/// Asteroid composition; affects toughness, contact damage and drop odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Material {
    #[default]
    Rock,
    Crystal,
    Metal,
}

impl Material {
    pub fn hp_factor(self) -> f32 {
        match self {
            Material::Rock => 2.6,
            Material::Crystal => 3.0,
            Material::Metal => 5.0,
        }
    }

    pub fn contact_factor(self) -> f32 {
        match self {
            Material::Rock => 1.0,
            Material::Crystal => 0.92,
            Material::Metal => 1.24,
        }
    }

    pub fn drop_chance(self) -> f32 {
        match self {
            Material::Rock => 0.09,
            Material::Crystal => 0.2,
            Material::Metal => 0.16,
        }
    }

    /// Chance that a drop is forced to be a utility instead of a weapon.
    pub fn force_utility_chance(self) -> f32 {
        match self {
            Material::Metal => 0.5,
            _ => 0.25,
        }
    }

    pub fn hit_color(self) -> u32 {
        match self {
            Material::Rock => 0x8a7a6a,
            Material::Crystal => 0x9db4cc,
            Material::Metal => 0x8a8680,
        }
    }

    pub fn explosion_palette(self) -> &'static [u32] {
        match self {
            Material::Rock => &[0xff8c00, 0xffaa00, 0xffd4a3],
            Material::Crystal => &[0x9db4cc, 0x7fa3cc, 0x00f3ff, 0xf2fdff],
            Material::Metal => &[0x8a8680, 0xc3c0ba, 0xfff4e0],
        }
    }
}

/// Kind-specific payload for an enemy. Behavior parameters are captured
/// from the difficulty snapshot at spawn time and stay frozen for the
/// enemy's lifetime.
#[derive(Debug, Clone)]
pub enum EnemyKind {
    Asteroid {
        size_class: u8,
        material: Material,
        rot_speed: f32,
    },
    Drone {
        sway: f32,
        fire_cooldown: f32,
        /// Base refire delay (seconds) before jitter, frozen at spawn
        refire_base: f32,
        refire_scale: f32,
        shot_damage: f32,
        /// Absolute bolt speed in px/s, frozen at spawn
        bolt_speed: f32,
        bolt_radius: f32,
        ai_lead: f32,
        steer_gain: f32,
        max_strafe: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub dead: bool,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Damage inflicted by touching a player ship
    pub contact_damage: f32,
    /// Render-facing hit flash, decays per step
    pub flash: f32,
    pub rot: f32,
    pub kind: EnemyKind,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            dead: true,
            radius: 0.0,
            hp: 0.0,
            max_hp: 0.0,
            contact_damage: 0.0,
            flash: 0.0,
            rot: 0.0,
            kind: EnemyKind::Asteroid {
                size_class: 1,
                material: Material::Rock,
                rot_speed: 0.0,
            },
        }
    }
}

impl Enemy {
    pub fn asteroid_radius(size_class: u8) -> f32 {
        match size_class {
            1 => 15.0,
            2 => 32.0,
            _ => 55.0,
        }
    }

    pub fn reset_asteroid(
        &mut self,
        pos: Vec2,
        size_class: u8,
        material: Material,
        d: &Difficulty,
        wave: u32,
        rng: &mut Pcg32,
    ) {
        let radius = Self::asteroid_radius(size_class);
        let hp = (size_class as f32 * material.hp_factor() * d.enemy_hp)
            .round()
            .max(2.0);
        let contact_base = match size_class {
            1 => 36.0,
            2 => 56.0,
            _ => 82.0,
        };

        self.pos = pos;
        self.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 60.0 * d.enemy_speed,
            (rng.random::<f32>() * 70.0 + 45.0 + wave as f32 * 16.0) * d.enemy_speed,
        );
        self.dead = false;
        self.radius = radius;
        self.hp = hp;
        self.max_hp = hp;
        self.contact_damage = contact_base * material.contact_factor() * d.enemy_damage;
        self.flash = 0.0;
        self.rot = 0.0;
        self.kind = EnemyKind::Asteroid {
            size_class,
            material,
            rot_speed: (rng.random::<f32>() - 0.5) * 2.5,
        };
    }

    pub fn reset_drone(&mut self, pos: Vec2, d: &Difficulty, wave: u32, rng: &mut Pcg32) {
        let hp = ((8.0 + (wave as f32 * 0.7).floor()) * d.enemy_hp)
            .round()
            .max(8.0);
        let dir = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };

        self.pos = pos;
        self.vel = Vec2::new(
            dir * (70.0 + rng.random::<f32>() * 60.0) * d.enemy_speed,
            (30.0 + rng.random::<f32>() * 28.0) * d.enemy_speed,
        );
        self.dead = false;
        self.radius = 22.0;
        self.hp = hp;
        self.max_hp = hp;
        self.contact_damage = 32.0 + self.radius * 0.72;
        self.flash = 0.0;
        self.rot = 0.0;
        self.kind = EnemyKind::Drone {
            sway: rng.random::<f32>() * std::f32::consts::TAU,
            fire_cooldown: (1.9 + rng.random::<f32>() * 1.2) / d.enemy_fire_rate,
            refire_base: (1.8 - wave as f32 * 0.03).max(0.5),
            refire_scale: d.enemy_fire_rate.max(0.8),
            shot_damage: 22.0 * d.enemy_damage,
            bolt_speed: (240.0 + (wave as f32 * 24.0).min(280.0)) * d.enemy_bolt_speed,
            bolt_radius: 5.2 + ((d.enemy_bolt_speed - 1.0) * 3.0).min(3.0),
            ai_lead: d.ai_lead,
            steer_gain: 140.0 + wave as f32 * 6.0,
            max_strafe: (160.0 + wave as f32 * 14.0) * (0.8 + d.ai_lead),
        };
    }

    pub fn is_drone(&self) -> bool {
        matches!(self.kind, EnemyKind::Drone { .. })
    }
}

impl Recyclable for Enemy {
    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// Projectiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Bullet { railgun: bool },
    Missile,
}

/// A player-owned projectile.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub dead: bool,
    pub damage: f32,
    pub radius: f32,
    pub ttl: f32,
    /// Continues after the first hit instead of dying on it
    pub piercing: bool,
    pub color: u32,
    pub kind: ProjectileKind,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            dead: true,
            damage: 0.0,
            radius: 4.0,
            ttl: 0.0,
            piercing: false,
            color: palette::WHITE,
            kind: ProjectileKind::Bullet { railgun: false },
        }
    }
}

impl Projectile {
    #[allow(clippy::too_many_arguments)]
    pub fn reset_bullet(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        damage: f32,
        radius: f32,
        color: u32,
        piercing: bool,
        railgun: bool,
    ) {
        self.pos = pos;
        self.vel = vel;
        self.dead = false;
        self.damage = damage;
        self.radius = radius;
        self.ttl = 2.0;
        self.piercing = piercing;
        self.color = color;
        self.kind = ProjectileKind::Bullet { railgun };
    }

    pub fn reset_missile(&mut self, pos: Vec2, color: u32, damage: f32, rng: &mut Pcg32) {
        self.pos = pos;
        self.vel = Vec2::new((rng.random::<f32>() - 0.5) * 100.0, -600.0);
        self.dead = false;
        self.damage = damage;
        self.radius = 6.5;
        self.ttl = 3.0;
        self.piercing = false;
        self.color = color;
        self.kind = ProjectileKind::Missile;
    }

    /// Advance position, age out and cull once off-screen.
    pub fn integrate(&mut self, dt: f32, arena_w: f32) {
        self.pos += self.vel * dt;
        self.ttl -= dt;
        if self.ttl <= 0.0
            || self.pos.y < -50.0
            || self.pos.x < -50.0
            || self.pos.x > arena_w + 50.0
        {
            self.dead = true;
        }
    }
}

impl Recyclable for Projectile {
    fn is_dead(&self) -> bool {
        self.dead
    }
}

/// An aimed enemy projectile.
#[derive(Debug, Clone)]
pub struct EnemyBolt {
    pub pos: Vec2,
    pub vel: Vec2,
    pub dead: bool,
    pub radius: f32,
    pub damage: f32,
    pub ttl: f32,
}

impl Default for EnemyBolt {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            dead: true,
            radius: 5.2,
            damage: 0.0,
            ttl: 0.0,
        }
    }
}

impl EnemyBolt {
    pub fn reset(&mut self, pos: Vec2, target: Vec2, speed: f32, radius: f32, damage: f32) {
        let delta = target - pos;
        let len = delta.length().max(1.0);
        self.pos = pos;
        self.vel = delta / len * speed;
        self.dead = false;
        self.radius = radius;
        self.damage = damage;
        self.ttl = 4.0;
    }

    pub fn integrate(&mut self, dt: f32, arena_w: f32, arena_h: f32) {
        self.pos += self.vel * dt;
        self.ttl -= dt;
        if self.ttl <= 0.0
            || self.pos.y > arena_h + 80.0
            || self.pos.x < -80.0
            || self.pos.x > arena_w + 80.0
        {
            self.dead = true;
        }
    }
}

impl Recyclable for EnemyBolt {
    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// Pickups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityKind {
    /// +2 team shield charges
    Shield,
    /// -40 heat for every ship
    Coolant,
    /// 12 s fire-rate/speed boost for the team
    Overdrive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupPayload {
    Weapon(WeaponKind),
    Utility(UtilityKind),
}

/// Falls until collected or off-screen.
#[derive(Debug, Clone)]
pub struct Pickup {
    pub pos: Vec2,
    pub vel: Vec2,
    pub dead: bool,
    pub radius: f32,
    pub payload: PickupPayload,
}

impl Default for Pickup {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            dead: true,
            radius: 18.0,
            payload: PickupPayload::Utility(UtilityKind::Shield),
        }
    }
}

impl Pickup {
    pub fn reset(&mut self, pos: Vec2, payload: PickupPayload) {
        self.pos = pos;
        self.vel = Vec2::new(0.0, 80.0);
        self.dead = false;
        self.radius = 18.0;
        self.payload = payload;
    }

    pub fn update(&mut self, dt: f32, arena_h: f32) {
        self.pos += self.vel * dt;
        if self.pos.y > arena_h + 50.0 {
            self.dead = true;
        }
    }

    pub fn color(&self) -> u32 {
        match self.payload {
            PickupPayload::Weapon(w) => w.color(),
            PickupPayload::Utility(UtilityKind::Shield) => 0x6ad8ff,
            PickupPayload::Utility(UtilityKind::Coolant) => 0x88ffd8,
            PickupPayload::Utility(UtilityKind::Overdrive) => 0xffb25f,
        }
    }
}

impl Recyclable for Pickup {
    fn is_dead(&self) -> bool {
        self.dead
    }
}

// ---------------------------------------------------------------------------
// Cosmetics: particles, shockwaves, overlay flashes
// ---------------------------------------------------------------------------

/// Spawn parameters for a particle burst. Velocity is scattered uniformly
/// in `[-speed/2, speed/2]` per axis at reset time.
#[derive(Debug, Clone, Copy)]
pub struct ParticleDef {
    pub color: u32,
    pub size: f32,
    pub speed: f32,
    pub life: f32,
    pub drag: f32,
    pub additive: bool,
    pub glow: bool,
}

impl Default for ParticleDef {
    fn default() -> Self {
        Self {
            color: palette::WHITE,
            size: 2.0,
            speed: 100.0,
            life: 1.0,
            drag: 0.95,
            additive: false,
            glow: false,
        }
    }
}

/// Purely cosmetic; never participates in gameplay collision.
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
    pub drag: f32,
    pub additive: bool,
    pub glow: bool,
}

impl Particle {
    pub fn reset(&mut self, pos: Vec2, def: &ParticleDef, rng: &mut Pcg32) {
        self.pos = pos;
        self.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * def.speed,
            (rng.random::<f32>() - 0.5) * def.speed,
        );
        self.color = def.color;
        self.size = def.size;
        self.life = def.life;
        self.max_life = def.life;
        self.drag = def.drag;
        self.additive = def.additive;
        self.glow = def.glow;
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= self.drag;
        self.life -= dt;
    }
}

impl Recyclable for Particle {
    fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Expanding impact ring.
#[derive(Debug, Clone, Default)]
pub struct Shockwave {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
}

impl Shockwave {
    pub fn reset(&mut self, pos: Vec2, radius: f32, life: f32, color: u32) {
        self.pos = pos;
        self.radius = radius;
        self.max_radius = radius * 2.1;
        self.life = life;
        self.max_life = life;
        self.color = color;
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        let pct = (self.life / self.max_life).max(0.0);
        self.radius += (self.max_radius - self.radius) * (1.0 - pct) * dt * 7.0;
    }
}

impl Recyclable for Shockwave {
    fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Full-screen additive flash.
#[derive(Debug, Clone, Default)]
pub struct OverlayFlash {
    pub ttl: f32,
    pub max_ttl: f32,
    pub color: u32,
}

impl OverlayFlash {
    pub fn reset(&mut self, duration: f32, color: u32) {
        self.ttl = duration;
        self.max_ttl = duration;
        self.color = color;
    }

    pub fn update(&mut self, dt: f32) {
        self.ttl -= dt;
    }
}

impl Recyclable for OverlayFlash {
    fn is_dead(&self) -> bool {
        self.ttl <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn asteroid_stats_scale_with_difficulty() {
        let mut rng = rng();
        let soft = crate::sim::difficulty::difficulty_for(1);
        let hard = crate::sim::difficulty::difficulty_for(8);

        let mut a = Enemy::default();
        a.reset_asteroid(Vec2::ZERO, 2, Material::Metal, &soft, 1, &mut rng);
        let mut b = Enemy::default();
        b.reset_asteroid(Vec2::ZERO, 2, Material::Metal, &hard, 8, &mut rng);

        assert!(b.hp > a.hp);
        assert!(b.contact_damage > a.contact_damage);
        assert_eq!(a.radius, 32.0);
    }

    #[test]
    fn small_rock_floors_at_two_hp() {
        let mut rng = rng();
        let d = crate::sim::difficulty::difficulty_for(1);
        let mut a = Enemy::default();
        a.reset_asteroid(Vec2::ZERO, 1, Material::Rock, &d, 1, &mut rng);
        assert_eq!(a.hp, 2.0);
    }

    #[test]
    fn drone_freezes_bolt_speed_at_spawn() {
        let mut rng = rng();
        let d = crate::sim::difficulty::difficulty_for(3);
        let mut e = Enemy::default();
        e.reset_drone(Vec2::new(100.0, 100.0), &d, 3, &mut rng);
        let EnemyKind::Drone { bolt_speed, .. } = e.kind else {
            panic!("expected drone payload");
        };
        assert_eq!(bolt_speed, (240.0 + 72.0) * d.enemy_bolt_speed);
    }

    #[test]
    fn projectile_dies_off_screen() {
        let mut p = Projectile::default();
        p.reset_bullet(
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, -4000.0),
            2.8,
            7.0,
            palette::WHITE,
            false,
            false,
        );
        for _ in 0..10 {
            p.integrate(1.0 / 120.0, 1600.0);
        }
        assert!(p.dead);
    }

    #[test]
    fn bolt_aims_at_target() {
        let mut b = EnemyBolt::default();
        b.reset(Vec2::ZERO, Vec2::new(0.0, 100.0), 300.0, 5.2, 22.0);
        assert!(b.vel.x.abs() < 1e-4);
        assert!((b.vel.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn particle_ages_out() {
        let mut rng = rng();
        let mut p = Particle::default();
        p.reset(
            Vec2::ZERO,
            &ParticleDef {
                life: 0.1,
                ..Default::default()
            },
            &mut rng,
        );
        assert!(!p.is_dead());
        for _ in 0..20 {
            p.update(1.0 / 120.0);
        }
        assert!(p.is_dead());
    }
}
