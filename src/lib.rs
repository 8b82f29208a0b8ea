//! Neon Survivor - top-down survival arena simulation core
//!
//! Core modules:
//! - `sim`: the real-time simulation (entities, spatial index, pools, frame update)
//! - `audio`: fire-and-forget audio cue interface for the presentation layer
//! - `highscores`: high-score persistence seam
//!
//! Rendering, menus and input capture live outside this crate; the
//! simulation exposes a per-frame [`sim::RenderSnapshot`] and a small
//! command surface on [`sim::World`].

pub mod audio;
pub mod highscores;
pub mod sim;

pub use audio::{AudioCue, AudioSink, NullAudio};
pub use highscores::{JsonFileScoreStore, MemoryScoreStore, ScoreStore};
pub use sim::{GamePhase, InputState, RenderSnapshot, World};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper bound callers should clamp `dt` to before calling
    /// `World::advance` (large steps tunnel through collisions).
    pub const MAX_DT: f32 = 0.1;

    /// Agent (player) defaults
    pub const AGENT_RADIUS: f32 = 15.0;
    pub const AGENT_SPEED: f32 = 300.0;
    pub const AGENT_MAX_HP: f32 = 100.0;
    /// Experience required for the first level-up; grows x1.5 per level
    pub const XP_BASE: u32 = 100;
    /// Post-damage invulnerability window (seconds)
    pub const INVULN_DURATION: f32 = 0.5;
    /// Contact damage taken from any hostile
    pub const CONTACT_DAMAGE: f32 = 10.0;

    /// Timed effects
    pub const WEAPON_DURATION: f32 = 10.0;
    pub const SHIELD_DURATION: f32 = 3.0;
    pub const SHIELD_COOLDOWN: f32 = 10.0;
    pub const ELITE_DURATION: f32 = 2.0;
    pub const ELITE_COOLDOWN: f32 = 15.0;
    pub const ELITE_SPEED_MULT: f32 = 1.8;
    pub const MAGNET_DURATION: f32 = 8.0;
    pub const MAGNET_RADIUS: f32 = 200.0;
    pub const MAGNET_PULL_SPEED: f32 = 300.0;
    pub const SPEED_BOOST_DURATION: f32 = 6.0;
    pub const SPEED_BOOST_MULT: f32 = 1.5;

    /// Hostile defaults
    pub const HOSTILE_RADIUS: f32 = 12.0;
    pub const HOSTILE_HP: f32 = 2.0;
    pub const CHASER_BASE_SPEED: f32 = 100.0;
    /// Random speed spread added per chaser at spawn
    pub const CHASER_SPEED_JITTER: f32 = 50.0;
    /// Extra chaser speed per agent level
    pub const CHASER_LEVEL_SPEED: f32 = 5.0;
    pub const SEEKER_RADIUS: f32 = 15.0;
    pub const SEEKER_HP: f32 = 3.0;
    pub const SEEKER_BASE_SPEED: f32 = 150.0;
    pub const SEEKER_SPEED_JITTER: f32 = 100.0;
    /// Homing steering turn rate (radians per second)
    pub const SEEKER_TURN_RATE: f32 = 2.0;
    /// Wander angle drift scale (radians per second, centered noise)
    pub const SEEKER_WANDER_DRIFT: f32 = 5.0;
    /// Blend weight of the wander vector against the homing vector
    pub const SEEKER_WANDER_WEIGHT: f32 = 0.5;
    /// Brief white flash after taking a hit
    pub const FLASH_DURATION: f32 = 0.1;

    /// Boss
    pub const BOSS_COLOR: u32 = 0xff0044;
    pub const BOSS_RADIUS: f32 = 40.0;
    pub const BOSS_HP: f32 = 500.0;
    pub const BOSS_SPEED: f32 = 150.0;
    pub const BOSS_SPAWN_DISTANCE: f32 = 800.0;
    /// Cumulative play time that triggers the boss fight (seconds)
    pub const BOSS_FIGHT_AT: f32 = 60.0;
    /// One-time speed bonus once hit points drop below half
    pub const BOSS_ENRAGE_SPEED_BONUS: f32 = 60.0;
    pub const SLAM_RADIUS: f32 = 150.0;
    pub const SLAM_DAMAGE: f32 = 25.0;
    /// Slam is chosen over rockets when the agent is this close
    pub const SLAM_PICK_RANGE: f32 = 180.0;
    /// Life timer for boss-fired seeking munitions (seconds)
    pub const BOSS_ROCKET_LIFE: f32 = 6.0;
    pub const BOSS_PREPARE_ROCKETS: f32 = 0.8;
    pub const BOSS_FIRING_DURATION: f32 = 3.0;
    pub const BOSS_PREPARE_SLAM: f32 = 0.5;
    /// Attack cooldown base, scaled down as the boss loses hit points
    pub const BOSS_COOLDOWN_BASE: f32 = 4.0;
    pub const BOSS_COOLDOWN_MIN: f32 = 1.5;

    /// Projectiles
    pub const BOLT_SPEED: f32 = 600.0;
    pub const BOLT_RADIUS: f32 = 6.0;
    pub const BOLT_DAMAGE: f32 = 10.0;
    pub const BOLT_LIFE: f32 = 2.0;
    pub const ROCKET_SPEED: f32 = 450.0;
    pub const ROCKET_RADIUS: f32 = 8.0;
    pub const ROCKET_DAMAGE: f32 = 25.0;
    pub const ROCKET_LIFE: f32 = 3.0;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 8.0;
    pub const PICKUP_LIFETIME: f32 = 10.0;
    pub const HEALTH_PICKUP_AMOUNT: f32 = 20.0;
    pub const XP_PICKUP_AMOUNT: u32 = 10;
    /// Chance that a destroyed hostile drops anything at all
    pub const DROP_CHANCE: f32 = 0.05;

    /// Floating text
    pub const TEXT_LIFETIME: f32 = 1.0;
    pub const TEXT_RISE_SPEED: f32 = 50.0;

    /// Explosion particles
    /// Life fraction lost per second (full burst fades in 0.5 s)
    pub const PARTICLE_DECAY: f32 = 2.0;
    pub const PARTICLE_MIN_SPEED: f32 = 50.0;
    pub const PARTICLE_MAX_SPEED: f32 = 150.0;
    pub const PARTICLE_MIN_RADIUS: f32 = 1.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 4.0;
    /// Burst size for a projectile impact
    pub const HIT_PARTICLES: u32 = 5;
    /// Burst size for the boss going down
    pub const BOSS_DEFEAT_PARTICLES: u32 = 100;

    /// Scoring
    pub const HOSTILE_SCORE: u32 = 10;
    pub const HOSTILE_XP: u32 = 20;
    pub const BOSS_SCORE: u32 = 5000;
    pub const BOSS_XP: u32 = 1000;

    /// Session pacing
    pub const INITIAL_HOSTILES: u32 = 4;
    /// Hostile spawn interval while the boss fight is active
    pub const BOSS_FIGHT_SPAWN_INTERVAL: f32 = 3.0;
    /// Heartbeat cue fires below this hp ratio
    pub const HEARTBEAT_HP_RATIO: f32 = 0.3;
    pub const HEARTBEAT_INTERVAL: f32 = 1.0;

    /// Screen shake magnitudes
    pub const SHAKE_HOSTILE_DEATH: f32 = 3.0;
    pub const SHAKE_AGENT_DAMAGE: f32 = 8.0;
    pub const SHAKE_GAME_OVER: f32 = 20.0;
    pub const SHAKE_BOSS_DEFEAT: f32 = 50.0;

    /// Spatial index cell size. Must stay >= the largest entity
    /// diameter (boss, 80) or the 3x3 broad-phase window can miss
    /// true neighbors. Tunable, not enforced.
    pub const GRID_CELL_SIZE: f32 = 100.0;

    /// Camera follow lerp factor (per second)
    pub const CAMERA_LERP: f32 = 5.0;
    /// Screen shake decay (units per second)
    pub const SHAKE_DECAY: f32 = 30.0;
}

/// Rotate a vector by `angle` radians (counter-clockwise).
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Linear interpolation between two points, `t` clamped to [0, 1].
#[inline]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate_vec(Vec2::X, FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(5.0, -3.0);
        assert_eq!(lerp_vec(a, b, 0.0), a);
        assert_eq!(lerp_vec(a, b, 1.0), b);
        // t outside [0,1] clamps
        assert_eq!(lerp_vec(a, b, 2.0), b);
    }

    #[test]
    fn distance_zero_iff_equal() {
        let a = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance(a), 0.0);
        assert!(a.distance(Vec2::ZERO) > 0.0);
    }

    proptest! {
        #[test]
        fn normalize_has_unit_length(x in -1e4f32..1e4, y in -1e4f32..1e4) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 1e-3);
            let n = v.normalize_or_zero();
            prop_assert!((n.length() - 1.0).abs() < 1e-3);
        }

        #[test]
        fn distance_is_symmetric(ax in -1e4f32..1e4, ay in -1e4f32..1e4,
                                 bx in -1e4f32..1e4, by in -1e4f32..1e4) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(a.distance(b), b.distance(a));
            prop_assert!(a.distance(b) >= 0.0);
        }

        #[test]
        fn rotation_preserves_length(x in -1e3f32..1e3, y in -1e3f32..1e3,
                                     angle in -10.0f32..10.0) {
            let v = Vec2::new(x, y);
            let r = rotate_vec(v, angle);
            prop_assert!((r.length() - v.length()).abs() < v.length().max(1.0) * 1e-4);
        }
    }
}
