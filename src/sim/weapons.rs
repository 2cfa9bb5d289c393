//! Weapon definitions and firing patterns
//!
//! Each weapon is a fire delay, a heat cost and a projectile pattern.
//! Overdrive tightens the delay, discounts heat and adds a third projectile
//! to the twin-shot weapons.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::registry::EntityRegistry;
use super::state::Sfx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Blaster,
    Scatter,
    Plasma,
    Laser,
    Missiles,
    Railgun,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Blaster,
        WeaponKind::Scatter,
        WeaponKind::Plasma,
        WeaponKind::Laser,
        WeaponKind::Missiles,
        WeaponKind::Railgun,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Blaster => "BLASTER MK-II",
            WeaponKind::Scatter => "SCATTER CANNON",
            WeaponKind::Plasma => "PLASMA DESTROYER",
            WeaponKind::Laser => "PULSE LASER",
            WeaponKind::Missiles => "HOMING MISSILES",
            WeaponKind::Railgun => "RAILGUN SNIPER",
        }
    }

    /// Seconds between shots at normal drive.
    pub fn fire_delay(self) -> f32 {
        match self {
            WeaponKind::Blaster => 0.07,
            WeaponKind::Scatter => 0.14,
            WeaponKind::Plasma => 0.34,
            WeaponKind::Laser => 0.045,
            WeaponKind::Missiles => 0.22,
            WeaponKind::Railgun => 0.52,
        }
    }

    /// Heat added per trigger pull.
    pub fn heat_cost(self) -> f32 {
        match self {
            WeaponKind::Blaster => 7.0,
            WeaponKind::Scatter => 12.0,
            WeaponKind::Plasma => 24.0,
            WeaponKind::Laser => 6.0,
            WeaponKind::Missiles => 16.0,
            WeaponKind::Railgun => 32.0,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            WeaponKind::Blaster => 0x00f3ff,
            WeaponKind::Scatter => 0xffee00,
            WeaponKind::Plasma => 0x00ff88,
            WeaponKind::Laser => 0xff2e97,
            WeaponKind::Missiles => 0xff8c00,
            WeaponKind::Railgun => 0xb537ff,
        }
    }

    /// Screen shake contributed by one shot.
    pub fn shake(self) -> f32 {
        match self {
            WeaponKind::Railgun => 10.0,
            WeaponKind::Plasma => 8.0,
            _ => 4.0,
        }
    }

    /// Downward kick applied to the firing ship.
    pub fn recoil(self) -> f32 {
        match self {
            WeaponKind::Railgun => 100.0,
            _ => 0.0,
        }
    }

    /// Next weapon in cycle order (manual weapon switching).
    pub fn next(self) -> WeaponKind {
        let idx = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Spawn this weapon's projectile pattern from `muzzle`. Spawns are subject
/// to the registry's bullet ceiling; a full arena silently drops the shot.
/// Returns the sound effect the shell should play.
pub fn fire(
    kind: WeaponKind,
    muzzle: Vec2,
    overdrive: bool,
    registry: &mut EntityRegistry,
    rng: &mut Pcg32,
) -> Sfx {
    let color = kind.color();
    match kind {
        WeaponKind::Blaster => {
            registry.spawn_bullet(
                muzzle + Vec2::new(-7.0, 0.0),
                Vec2::new(-80.0, -1320.0),
                2.8,
                7.0,
                color,
                false,
                false,
            );
            registry.spawn_bullet(
                muzzle + Vec2::new(7.0, 0.0),
                Vec2::new(80.0, -1320.0),
                2.8,
                7.0,
                color,
                false,
                false,
            );
            if overdrive {
                registry.spawn_bullet(
                    muzzle + Vec2::new(0.0, -5.0),
                    Vec2::new(0.0, -1450.0),
                    3.4,
                    8.0,
                    color,
                    false,
                    false,
                );
            }
            Sfx::Shoot
        }
        WeaponKind::Scatter => {
            for i in -3i32..=3 {
                let angle = i as f32 * 0.12;
                let vel = Vec2::new(angle.sin(), -angle.cos()) * 1160.0;
                registry.spawn_bullet(muzzle, vel, 1.8, 5.4, color, false, false);
            }
            Sfx::Shoot
        }
        WeaponKind::Plasma => {
            registry.spawn_bullet(muzzle, Vec2::new(0.0, -860.0), 30.0, 16.0, color, true, false);
            Sfx::Plasma
        }
        WeaponKind::Laser => {
            registry.spawn_bullet(
                muzzle + Vec2::new(-12.0, 0.0),
                Vec2::new(0.0, -1650.0),
                1.9,
                4.6,
                color,
                false,
                false,
            );
            registry.spawn_bullet(
                muzzle + Vec2::new(12.0, 0.0),
                Vec2::new(0.0, -1650.0),
                1.9,
                4.6,
                color,
                false,
                false,
            );
            if overdrive {
                registry.spawn_bullet(muzzle, Vec2::new(0.0, -1750.0), 2.6, 5.6, color, false, false);
            }
            Sfx::ShootLaser
        }
        WeaponKind::Missiles => {
            registry.spawn_missile(muzzle + Vec2::new(-14.0, 0.0), color, 10.0, rng);
            registry.spawn_missile(muzzle + Vec2::new(14.0, 0.0), color, 10.0, rng);
            if overdrive {
                registry.spawn_missile(muzzle + Vec2::new(0.0, -6.0), color, 12.0, rng);
            }
            Sfx::ShootMissile
        }
        WeaponKind::Railgun => {
            registry.spawn_bullet(muzzle, Vec2::new(0.0, -2200.0), 44.0, 11.0, color, true, true);
            Sfx::ShootRailgun
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup() -> (EntityRegistry, Pcg32) {
        (EntityRegistry::new(), Pcg32::seed_from_u64(3))
    }

    #[test]
    fn blaster_fires_twin_bolts() {
        let (mut reg, mut rng) = setup();
        fire(WeaponKind::Blaster, Vec2::new(800.0, 700.0), false, &mut reg, &mut rng);
        assert_eq!(reg.bullets.len(), 2);
        fire(WeaponKind::Blaster, Vec2::new(800.0, 700.0), true, &mut reg, &mut rng);
        assert_eq!(reg.bullets.len(), 5);
    }

    #[test]
    fn scatter_fires_a_seven_way_fan() {
        let (mut reg, mut rng) = setup();
        fire(WeaponKind::Scatter, Vec2::new(800.0, 700.0), false, &mut reg, &mut rng);
        assert_eq!(reg.bullets.len(), 7);
        assert!(reg.bullets.iter().all(|b| b.vel.y < 0.0));
    }

    #[test]
    fn heavy_weapons_pierce() {
        let (mut reg, mut rng) = setup();
        fire(WeaponKind::Plasma, Vec2::ZERO, false, &mut reg, &mut rng);
        fire(WeaponKind::Railgun, Vec2::ZERO, false, &mut reg, &mut rng);
        assert!(reg.bullets.iter().all(|b| b.piercing));
    }

    #[test]
    fn weapon_cycle_visits_every_kind() {
        let mut seen = vec![];
        let mut w = WeaponKind::Blaster;
        for _ in 0..WeaponKind::ALL.len() {
            seen.push(w);
            w = w.next();
        }
        assert_eq!(w, WeaponKind::Blaster);
        assert_eq!(seen.len(), WeaponKind::ALL.len());
    }
}
