//! Weapon behaviors
//!
//! One flat enum, one `match`. Timed weapons are installed by pickups
//! and revert via the agent's `weapon_timer`; the only stateful
//! variant (orbital burst) keeps its rotation on the agent so the
//! kind itself stays `Copy`.

use glam::Vec2;

use super::entity::{Projectile, ProjectileKind};
use super::pool::ObjectPool;
use crate::rotate_vec;

/// Spread half-angle for the triple bolt (radians)
const TRIPLE_SPREAD: f32 = 0.2;
/// Spread half-angle for the triple rocket (radians)
const TRIPLE_ROCKET_SPREAD: f32 = 0.3;
/// Orbital burst rotation advance per volley (radians)
const ORBITAL_STEP: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    /// Single bolt at the aim point
    Default,
    /// Three bolts fanned around the aim point
    Triple,
    /// Four bolts at right angles, rotating between volleys
    OrbitalBurst,
    /// Single rocket
    Rocket,
    /// Three rockets fanned around the aim point
    TripleRocket,
}

impl WeaponKind {
    /// Spawn this weapon's volley into `out`, pulling projectiles
    /// from `pool`. `aim` is the direction from `origin` toward the
    /// target; a zero vector falls back to +X inside projectile init.
    /// `orbital_phase` is read and advanced only by the orbital burst.
    pub fn fire(
        self,
        origin: Vec2,
        aim: Vec2,
        orbital_phase: &mut f32,
        pool: &mut ObjectPool<Projectile>,
        out: &mut Vec<Projectile>,
    ) {
        match self {
            WeaponKind::Default => {
                out.push(pool.acquire(|p| p.init(ProjectileKind::Bolt, origin, aim)));
            }
            WeaponKind::Triple => {
                for angle in [-TRIPLE_SPREAD, 0.0, TRIPLE_SPREAD] {
                    let dir = rotate_vec(aim, angle);
                    out.push(pool.acquire(|p| p.init(ProjectileKind::Bolt, origin, dir)));
                }
            }
            WeaponKind::OrbitalBurst => {
                for quarter in 0..4 {
                    let angle = *orbital_phase + quarter as f32 * std::f32::consts::FRAC_PI_2;
                    let dir = Vec2::from_angle(angle);
                    out.push(pool.acquire(|p| p.init(ProjectileKind::Bolt, origin, dir)));
                }
                *orbital_phase += ORBITAL_STEP;
            }
            WeaponKind::Rocket => {
                out.push(pool.acquire(|p| p.init(ProjectileKind::Rocket, origin, aim)));
            }
            WeaponKind::TripleRocket => {
                for angle in [-TRIPLE_ROCKET_SPREAD, 0.0, TRIPLE_ROCKET_SPREAD] {
                    let dir = rotate_vec(aim, angle);
                    out.push(pool.acquire(|p| p.init(ProjectileKind::Rocket, origin, dir)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volley(kind: WeaponKind, aim: Vec2, phase: &mut f32) -> Vec<Projectile> {
        let mut pool = ObjectPool::with_capacity(8);
        let mut out = Vec::new();
        kind.fire(Vec2::ZERO, aim, phase, &mut pool, &mut out);
        out
    }

    #[test]
    fn default_fires_one_bolt_at_aim() {
        let mut phase = 0.0;
        let out = volley(WeaponKind::Default, Vec2::Y, &mut phase);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, ProjectileKind::Bolt);
        assert!((out[0].vel.normalize() - Vec2::Y).length() < 1e-5);
        assert_eq!(phase, 0.0, "phase untouched by non-orbital weapons");
    }

    #[test]
    fn triple_fans_around_the_aim() {
        let mut phase = 0.0;
        let out = volley(WeaponKind::Triple, Vec2::X, &mut phase);
        assert_eq!(out.len(), 3);
        // Middle bolt straight at the aim
        assert!((out[1].vel.normalize() - Vec2::X).length() < 1e-5);
        // Flanks mirror each other around the aim axis
        let a = out[0].vel.normalize();
        let b = out[2].vel.normalize();
        assert!((a.x - b.x).abs() < 1e-5);
        assert!((a.y + b.y).abs() < 1e-5);
    }

    #[test]
    fn orbital_burst_rotates_between_volleys() {
        let mut phase = 0.0;
        let first = volley(WeaponKind::OrbitalBurst, Vec2::X, &mut phase);
        assert_eq!(first.len(), 4);
        assert_eq!(phase, ORBITAL_STEP);

        let second = volley(WeaponKind::OrbitalBurst, Vec2::X, &mut phase);
        let d0 = first[0].vel.normalize();
        let d1 = second[0].vel.normalize();
        // Second volley has rotated by the step angle
        assert!((d0.angle_to(d1) - ORBITAL_STEP).abs() < 1e-4);
    }

    #[test]
    fn orbital_burst_covers_four_quadrants() {
        let mut phase = 0.0;
        let out = volley(WeaponKind::OrbitalBurst, Vec2::X, &mut phase);
        for pair in out.windows(2) {
            let angle = pair[0].vel.angle_to(pair[1].vel).abs();
            assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        }
    }

    #[test]
    fn rockets_carry_rocket_stats() {
        let mut phase = 0.0;
        let out = volley(WeaponKind::TripleRocket, Vec2::X, &mut phase);
        assert_eq!(out.len(), 3);
        for p in &out {
            assert_eq!(p.kind, ProjectileKind::Rocket);
            assert_eq!(p.damage, crate::consts::ROCKET_DAMAGE);
        }
    }
}
