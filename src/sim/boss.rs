//! Boss entity and attack phase machine
//!
//! The boss is a singleton living in `World::boss`. Its `update`
//! never touches the rest of the world directly; attacks come back as
//! [`BossAttack`] values the frame step applies, so boss logic stays
//! borrow-free and testable in isolation.

use glam::Vec2;

use crate::consts::*;

/// Attack phase. `Chase` is the rest state; attacks run
/// prepare -> execute and then drop back to `Chase` on a cooldown.
/// `Slamming` lasts one update; it is a named phase so a renderer
/// can telegraph the impact frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossPhase {
    Chase,
    PrepareRockets { timer: f32 },
    FiringRockets { timer: f32, fire_timer: f32 },
    PrepareSlam { timer: f32 },
    Slamming,
}

/// Deferred attack effect for the frame step to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAttack {
    /// Launch one seeking munition at the agent
    Rocket,
    /// Area damage around the boss position
    Slam,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub phase: BossPhase,
    /// Time until the next attack may start (Chase only)
    pub attack_cooldown: f32,
    /// One-time speed surge below half health
    pub enraged: bool,
    pub flash_timer: f32,
}

impl Boss {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            radius: BOSS_RADIUS,
            hp: BOSS_HP,
            max_hp: BOSS_HP,
            speed: BOSS_SPEED,
            phase: BossPhase::Chase,
            attack_cooldown: BOSS_COOLDOWN_BASE,
            enraged: false,
            flash_timer: 0.0,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        (self.hp / self.max_hp).max(0.0)
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Advance the phase machine one step. Movement happens here;
    /// attack effects are returned for the caller to apply. At most
    /// one attack per step (the shortest fire interval is well above
    /// any sane `dt`).
    pub fn update(&mut self, agent_pos: Vec2, dt: f32) -> Option<BossAttack> {
        self.flash_timer = (self.flash_timer - dt).max(0.0);

        // Read once; the match arms hold a borrow of `self.phase`
        let hp_ratio = self.hp_ratio();

        if !self.enraged && hp_ratio < 0.5 {
            self.enraged = true;
            self.speed += BOSS_ENRAGE_SPEED_BONUS;
        }

        match self.phase {
            BossPhase::Chase => {
                let to_agent = agent_pos - self.pos;
                self.pos += to_agent.normalize_or_zero() * self.speed * dt;

                self.attack_cooldown -= dt;
                if self.attack_cooldown <= 0.0 {
                    self.phase = if to_agent.length() <= SLAM_PICK_RANGE {
                        BossPhase::PrepareSlam {
                            timer: BOSS_PREPARE_SLAM,
                        }
                    } else {
                        BossPhase::PrepareRockets {
                            timer: BOSS_PREPARE_ROCKETS,
                        }
                    };
                }
                None
            }
            BossPhase::PrepareRockets { ref mut timer } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    self.phase = BossPhase::FiringRockets {
                        timer: BOSS_FIRING_DURATION,
                        // First rocket leaves immediately
                        fire_timer: 0.0,
                    };
                }
                None
            }
            BossPhase::FiringRockets {
                ref mut timer,
                ref mut fire_timer,
            } => {
                *timer -= dt;
                *fire_timer -= dt;

                if *timer <= 0.0 {
                    // Lower health shortens the rest between attacks
                    self.attack_cooldown = (BOSS_COOLDOWN_BASE * hp_ratio).max(BOSS_COOLDOWN_MIN);
                    self.phase = BossPhase::Chase;
                    return None;
                }
                if *fire_timer <= 0.0 {
                    *fire_timer = 0.25 + 0.45 * hp_ratio;
                    return Some(BossAttack::Rocket);
                }
                None
            }
            BossPhase::PrepareSlam { ref mut timer } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    self.phase = BossPhase::Slamming;
                }
                None
            }
            BossPhase::Slamming => {
                self.attack_cooldown = BOSS_COOLDOWN_BASE;
                self.phase = BossPhase::Chase;
                Some(BossAttack::Slam)
            }
        }
    }
}
