//! Entity model
//!
//! Flat structs with kind discriminants - behavior differences are
//! `match` arms in the frame step, not type hierarchies. Pooled kinds
//! (`Hostile`, `Projectile`, `Pickup`, `FloatingText`) implement
//! `Default` so [`super::pool::ObjectPool`] can pre-warm them; their
//! `init_*` methods reset every field, since a recycled value carries
//! stale state.

use std::fmt::Write as _;

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Neon palette shared by hostiles, pickups and text accents.
pub const NEON_PALETTE: [u32; 6] = [
    0x00ffff, 0xff00ff, 0x00ff88, 0xffff00, 0xff6600, 0x66aaff,
];

pub fn random_neon(rng: &mut impl Rng) -> u32 {
    NEON_PALETTE[rng.random_range(0..NEON_PALETTE.len())]
}

/// The player-controlled entity.
#[derive(Debug, Clone)]
pub struct Agent {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    /// Remaining post-damage invulnerability
    pub invuln_timer: f32,
    pub weapon: super::weapon::WeaponKind,
    /// Countdown back to the default weapon; inert at zero
    pub weapon_timer: f32,
    /// Rotation state for the orbital burst weapon
    pub orbital_phase: f32,
    pub shield_timer: f32,
    pub shield_cooldown: f32,
    pub elite_timer: f32,
    pub elite_cooldown: f32,
    pub magnet_timer: f32,
    pub speed_boost_timer: f32,
    /// Paces the low-health audio cue
    pub heartbeat_timer: f32,
    pub color: u32,
}

impl Agent {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: AGENT_RADIUS,
            hp: AGENT_MAX_HP,
            max_hp: AGENT_MAX_HP,
            level: 1,
            xp: 0,
            xp_to_next: XP_BASE,
            invuln_timer: 0.0,
            weapon: super::weapon::WeaponKind::Default,
            weapon_timer: 0.0,
            orbital_phase: 0.0,
            shield_timer: 0.0,
            shield_cooldown: 0.0,
            elite_timer: 0.0,
            elite_cooldown: 0.0,
            magnet_timer: 0.0,
            speed_boost_timer: 0.0,
            heartbeat_timer: 0.0,
            color: 0x00ffff,
        }
    }

    /// Decay every countdown; weapon reversion happens here.
    pub fn tick_timers(&mut self, dt: f32) {
        self.invuln_timer = (self.invuln_timer - dt).max(0.0);
        self.shield_timer = (self.shield_timer - dt).max(0.0);
        self.shield_cooldown = (self.shield_cooldown - dt).max(0.0);
        self.elite_timer = (self.elite_timer - dt).max(0.0);
        self.elite_cooldown = (self.elite_cooldown - dt).max(0.0);
        self.magnet_timer = (self.magnet_timer - dt).max(0.0);
        self.speed_boost_timer = (self.speed_boost_timer - dt).max(0.0);
        self.heartbeat_timer = (self.heartbeat_timer - dt).max(0.0);

        if self.weapon_timer > 0.0 {
            self.weapon_timer -= dt;
            if self.weapon_timer <= 0.0 {
                self.weapon_timer = 0.0;
                self.weapon = super::weapon::WeaponKind::Default;
            }
        }
    }

    /// Effective movement speed including active buffs.
    pub fn speed(&self) -> f32 {
        let mut speed = AGENT_SPEED;
        if self.elite_timer > 0.0 {
            speed *= ELITE_SPEED_MULT;
        }
        if self.speed_boost_timer > 0.0 {
            speed *= SPEED_BOOST_MULT;
        }
        speed
    }

    /// Damage is ignored while any protection is up.
    pub fn is_protected(&self) -> bool {
        self.invuln_timer > 0.0 || self.shield_timer > 0.0 || self.elite_timer > 0.0
    }

    /// Install a timed weapon; reinstalling refreshes the countdown.
    pub fn install_weapon(&mut self, weapon: super::weapon::WeaponKind) {
        self.weapon = weapon;
        self.weapon_timer = WEAPON_DURATION;
    }

    pub fn try_shield(&mut self) -> bool {
        if self.shield_cooldown > 0.0 {
            return false;
        }
        self.shield_timer = SHIELD_DURATION;
        self.shield_cooldown = SHIELD_COOLDOWN;
        true
    }

    pub fn try_elite(&mut self) -> bool {
        if self.elite_cooldown > 0.0 {
            return false;
        }
        self.elite_timer = ELITE_DURATION;
        self.elite_cooldown = ELITE_COOLDOWN;
        true
    }

    /// Add experience; returns the number of levels gained. Each
    /// level-up refills hit points and scales the curve by x1.5.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut levels = 0;
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.xp_to_next = (self.xp_to_next as f32 * 1.5) as u32;
            self.level += 1;
            self.hp = self.max_hp;
            levels += 1;
        }
        levels
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostileKind {
    /// Steers straight at the agent
    Chaser,
    /// Homing with bounded turn rate and wander noise
    Seeker,
}

#[derive(Debug, Clone)]
pub struct Hostile {
    pub kind: HostileKind,
    pub pos: Vec2,
    /// Current travel direction (unit length once moving)
    pub heading: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Wander noise state (seekers only)
    pub wander_angle: f32,
    pub flash_timer: f32,
    /// Self-expiry; infinite for ordinary spawns, finite for boss
    /// munitions
    pub life: f32,
    pub color: u32,
}

impl Default for Hostile {
    fn default() -> Self {
        Self {
            kind: HostileKind::Chaser,
            pos: Vec2::ZERO,
            heading: Vec2::X,
            speed: 0.0,
            radius: HOSTILE_RADIUS,
            hp: 0.0,
            max_hp: HOSTILE_HP,
            wander_angle: 0.0,
            flash_timer: 0.0,
            life: f32::INFINITY,
            color: 0,
        }
    }
}

impl Hostile {
    /// Reset as a chaser; speed scales with the agent's level.
    pub fn init_chaser(&mut self, pos: Vec2, agent_level: u32, rng: &mut impl Rng) {
        *self = Self {
            kind: HostileKind::Chaser,
            pos,
            speed: CHASER_BASE_SPEED
                + rng.random_range(0.0..CHASER_SPEED_JITTER)
                + CHASER_LEVEL_SPEED * agent_level as f32,
            hp: HOSTILE_HP,
            max_hp: HOSTILE_HP,
            color: random_neon(rng),
            ..Self::default()
        };
    }

    /// Reset as a homing seeker aimed roughly at `toward`.
    pub fn init_seeker(&mut self, pos: Vec2, toward: Vec2, rng: &mut impl Rng) {
        *self = Self {
            kind: HostileKind::Seeker,
            pos,
            heading: (toward - pos).normalize_or_zero(),
            speed: SEEKER_BASE_SPEED + rng.random_range(0.0..SEEKER_SPEED_JITTER),
            radius: SEEKER_RADIUS,
            hp: SEEKER_HP,
            max_hp: SEEKER_HP,
            wander_angle: rng.random_range(0.0..std::f32::consts::TAU),
            color: random_neon(rng),
            ..Self::default()
        };
    }

    /// Reset as a boss munition: a seeker with a short fuse.
    pub fn init_boss_rocket(&mut self, pos: Vec2, toward: Vec2, rng: &mut impl Rng) {
        self.init_seeker(pos, toward, rng);
        self.life = BOSS_ROCKET_LIFE;
        self.color = 0xff3333;
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Bolt,
    Rocket,
}

/// Agent-fired munition; direction is fixed at spawn.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Remaining lifetime; zeroed on impact
    pub life: f32,
    pub color: u32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            kind: ProjectileKind::Bolt,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BOLT_RADIUS,
            damage: 0.0,
            life: 0.0,
            color: 0,
        }
    }
}

impl Projectile {
    pub fn init(&mut self, kind: ProjectileKind, pos: Vec2, dir: Vec2) {
        // Degenerate aim falls back to +X
        let dir = if dir.length_squared() > 0.0 {
            dir.normalize()
        } else {
            Vec2::X
        };
        *self = match kind {
            ProjectileKind::Bolt => Self {
                kind,
                pos,
                vel: dir * BOLT_SPEED,
                radius: BOLT_RADIUS,
                damage: BOLT_DAMAGE,
                life: BOLT_LIFE,
                color: 0x00ffff,
            },
            ProjectileKind::Rocket => Self {
                kind,
                pos,
                vel: dir * ROCKET_SPEED,
                radius: ROCKET_RADIUS,
                damage: ROCKET_DAMAGE,
                life: ROCKET_LIFE,
                color: 0xff8800,
            },
        };
    }

    pub fn is_spent(&self) -> bool {
        self.life <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Health,
    Xp,
    WeaponTriple,
    WeaponOrbital,
    WeaponRocket,
    WeaponTripleRocket,
    SpeedBoost,
    Shield,
    Magnet,
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    /// Effect magnitude (hp restored, xp granted)
    pub value: f32,
    pub radius: f32,
    /// Expires unclaimed at zero; zeroed on collection
    pub life: f32,
    pub color: u32,
}

impl Default for Pickup {
    fn default() -> Self {
        Self {
            kind: PickupKind::Xp,
            pos: Vec2::ZERO,
            value: 0.0,
            radius: PICKUP_RADIUS,
            life: 0.0,
            color: 0,
        }
    }
}

impl Pickup {
    pub fn init(&mut self, kind: PickupKind, pos: Vec2) {
        let (value, color) = match kind {
            PickupKind::Health => (HEALTH_PICKUP_AMOUNT, 0x00ff88),
            PickupKind::Xp => (XP_PICKUP_AMOUNT as f32, 0x00ffff),
            PickupKind::WeaponTriple => (0.0, 0xffff00),
            PickupKind::WeaponOrbital => (0.0, 0xff00ff),
            PickupKind::WeaponRocket => (0.0, 0xff6600),
            PickupKind::WeaponTripleRocket => (0.0, 0xff3366),
            PickupKind::SpeedBoost => (0.0, 0x66aaff),
            PickupKind::Shield => (0.0, 0x88ccff),
            PickupKind::Magnet => (0.0, 0xcc88ff),
        };
        *self = Self {
            kind,
            pos,
            value,
            radius: PICKUP_RADIUS,
            life: PICKUP_LIFETIME,
            color,
        };
    }

    pub fn is_claimed_or_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Explosion debris scattered from impacts and kills. Purely visual;
/// nothing collides with it.
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fades from 1 to 0; doubles as the render alpha
    pub life: f32,
    pub color: u32,
}

impl Particle {
    pub fn init(&mut self, pos: Vec2, color: u32, rng: &mut impl Rng) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
        *self = Self {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            radius: rng.random_range(PARTICLE_MIN_RADIUS..PARTICLE_MAX_RADIUS),
            life: 1.0,
            color,
        };
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Short-lived score/damage popup rising from its spawn point.
#[derive(Debug, Clone, Default)]
pub struct FloatingText {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Reused buffer; cleared and rewritten on init
    pub label: String,
    pub life: f32,
    pub color: u32,
}

impl FloatingText {
    pub fn init(&mut self, pos: Vec2, color: u32, args: std::fmt::Arguments<'_>) {
        self.pos = pos;
        self.vel = Vec2::new(0.0, -TEXT_RISE_SPEED);
        self.label.clear();
        // Writing into a String cannot fail
        let _ = self.label.write_fmt(args);
        self.life = TEXT_LIFETIME;
        self.color = color;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}
