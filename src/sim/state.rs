//! World state, session phases and the command surface
//!
//! `World` owns every entity list, the pools they recycle through,
//! the spatial index and the injected collaborators (audio sink,
//! score store). The per-frame step lives in [`super::tick`]; this
//! module holds construction, session control and the render
//! snapshot.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::boss::Boss;
use super::entity::{
    Agent, FloatingText, Hostile, HostileKind, Particle, Pickup, PickupKind, Projectile,
    ProjectileKind,
};
use super::grid::{GridRef, SpatialGrid};
use super::pool::ObjectPool;
use crate::audio::{AudioCue, AudioSink};
use crate::consts::*;
use crate::highscores::ScoreStore;

/// Chance a freshly spawned hostile is a seeker instead of a chaser
const SEEKER_SPAWN_CHANCE: f32 = 0.2;
/// Extra distance past the view edge where hostiles appear
const SPAWN_MARGIN: f32 = 100.0;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Menu,
    Playing,
    BossFight,
    Paused,
    GameOver,
}

/// Host-supplied input for the current frame
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Overrides the key booleans when non-zero
    pub joystick: Vec2,
    /// Aim point in world coordinates
    pub target: Vec2,
}

impl InputState {
    /// Movement direction, unit length or zero.
    pub fn direction(&self) -> Vec2 {
        if self.joystick.length_squared() > 0.0 {
            return self.joystick.normalize_or_zero();
        }
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub camera: Vec2,
    pub shake: f32,
    pub entities: Vec<EntityView>,
    pub particles: Vec<ParticleView>,
    pub texts: Vec<TextView>,
    pub hud: Hud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewKind {
    Agent,
    Chaser,
    Seeker,
    Boss,
    Bolt,
    Rocket,
    Pickup,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntityView {
    pub kind: ViewKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    /// Remaining life fraction for fade-out
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextView {
    pub pos: Vec2,
    pub label: String,
    pub color: u32,
    /// Remaining life fraction for fade-out
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub hp: f32,
    pub max_hp: f32,
    /// (current, max) while a boss is alive
    pub boss_hp: Option<(f32, f32)>,
}

/// The simulation world. Single-threaded; one instance per session
/// host.
pub struct World {
    pub phase: GamePhase,
    /// Phase to restore on unpause
    pub(super) prev_phase: GamePhase,

    pub agent: Agent,
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub boss: Option<Boss>,

    pub(super) hostile_pool: ObjectPool<Hostile>,
    pub(super) projectile_pool: ObjectPool<Projectile>,
    pub(super) pickup_pool: ObjectPool<Pickup>,
    pub(super) particle_pool: ObjectPool<Particle>,
    pub(super) text_pool: ObjectPool<FloatingText>,

    pub(super) grid: SpatialGrid,
    pub(super) query_buf: Vec<GridRef>,
    pub(super) rng: Pcg32,

    pub input: InputState,
    pub camera: Vec2,
    pub shake: f32,
    pub(super) view: Vec2,

    pub score: u32,
    pub high_score: u32,
    /// Cumulative unpaused play time; reset on boss defeat
    pub play_time: f32,
    pub(super) spawn_timer: f32,

    pub(super) audio: Box<dyn AudioSink>,
    pub(super) store: Box<dyn ScoreStore>,
}

impl World {
    /// Build a world in the menu phase. The high score is loaded once
    /// here; later saves go through the same store.
    pub fn new(seed: u64, audio: Box<dyn AudioSink>, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.load();
        Self {
            phase: GamePhase::Menu,
            prev_phase: GamePhase::Playing,
            agent: Agent::new(),
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            boss: None,
            hostile_pool: ObjectPool::with_capacity(32),
            projectile_pool: ObjectPool::with_capacity(64),
            pickup_pool: ObjectPool::with_capacity(16),
            particle_pool: ObjectPool::with_capacity(100),
            text_pool: ObjectPool::with_capacity(16),
            grid: SpatialGrid::new(),
            query_buf: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            input: InputState::default(),
            camera: Vec2::ZERO,
            shake: 0.0,
            view: Vec2::new(800.0, 600.0),
            score: 0,
            high_score,
            play_time: 0.0,
            spawn_timer: 0.0,
            audio,
            store,
        }
    }

    /// Start (or restart) a session. All live entities return to
    /// their pools; nothing from the previous run leaks through.
    pub fn start(&mut self) {
        for h in self.hostiles.drain(..) {
            self.hostile_pool.release(h);
        }
        for p in self.projectiles.drain(..) {
            self.projectile_pool.release(p);
        }
        for p in self.pickups.drain(..) {
            self.pickup_pool.release(p);
        }
        for p in self.particles.drain(..) {
            self.particle_pool.release(p);
        }
        for t in self.texts.drain(..) {
            self.text_pool.release(t);
        }
        self.boss = None;

        self.agent = Agent::new();
        self.score = 0;
        self.play_time = 0.0;
        self.spawn_timer = 0.0;
        self.camera = Vec2::ZERO;
        self.shake = 0.0;
        self.phase = GamePhase::Playing;
        self.prev_phase = GamePhase::Playing;

        for _ in 0..INITIAL_HOSTILES {
            self.spawn_hostile();
        }
        log::info!("session started (high score {})", self.high_score);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.view = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    pub fn set_joystick(&mut self, joystick: Vec2) {
        self.input.joystick = joystick;
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.input.target = target;
    }

    /// Fire the current weapon toward the aim point. Ignored outside
    /// an active session.
    pub fn fire(&mut self) {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::BossFight) {
            return;
        }
        let origin = self.agent.pos;
        let aim = self.input.target - origin;
        let weapon = self.agent.weapon;
        weapon.fire(
            origin,
            aim,
            &mut self.agent.orbital_phase,
            &mut self.projectile_pool,
            &mut self.projectiles,
        );
        self.audio.play(AudioCue::Shot);
    }

    /// Pause toggling remembers which active phase to come back to.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing | GamePhase::BossFight => {
                self.prev_phase = self.phase;
                self.phase = GamePhase::Paused;
            }
            GamePhase::Paused => {
                self.phase = self.prev_phase;
            }
            GamePhase::Menu | GamePhase::GameOver => {}
        }
    }

    pub fn trigger_shield(&mut self) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::BossFight) {
            self.agent.try_shield();
        }
    }

    pub fn trigger_elite(&mut self) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::BossFight) {
            self.agent.try_elite();
        }
    }

    /// Spawn one hostile just outside the view edge, aimed inward.
    pub(super) fn spawn_hostile(&mut self) {
        let agent_pos = self.agent.pos;
        let level = self.agent.level;
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let dist = self.view.max_element() * 0.5 + SPAWN_MARGIN;
        let pos = agent_pos + Vec2::from_angle(angle) * dist;

        let rng = &mut self.rng;
        let hostile = if rng.random::<f32>() < SEEKER_SPAWN_CHANCE {
            self.hostile_pool.acquire(|h| h.init_seeker(pos, agent_pos, rng))
        } else {
            self.hostile_pool.acquire(|h| h.init_chaser(pos, level, rng))
        };
        self.hostiles.push(hostile);
    }

    /// Weighted drop table: health 10 %, xp 30 %, the rest split
    /// evenly across weapon/buff kinds.
    pub(super) fn spawn_pickup(&mut self, pos: Vec2) {
        const RARE: [PickupKind; 7] = [
            PickupKind::WeaponTriple,
            PickupKind::WeaponOrbital,
            PickupKind::WeaponRocket,
            PickupKind::WeaponTripleRocket,
            PickupKind::SpeedBoost,
            PickupKind::Shield,
            PickupKind::Magnet,
        ];
        let roll = self.rng.random::<f32>();
        let kind = if roll < 0.10 {
            PickupKind::Health
        } else if roll < 0.40 {
            PickupKind::Xp
        } else {
            let idx = ((roll - 0.40) / 0.60 * RARE.len() as f32) as usize;
            RARE[idx.min(RARE.len() - 1)]
        };
        let pickup = self.pickup_pool.acquire(|p| p.init(kind, pos));
        self.pickups.push(pickup);
    }

    /// Burst of explosion debris scattered around `pos`.
    pub(super) fn spawn_particles(&mut self, pos: Vec2, count: u32, color: u32) {
        for _ in 0..count {
            let rng = &mut self.rng;
            let particle = self.particle_pool.acquire(|p| p.init(pos, color, rng));
            self.particles.push(particle);
        }
    }

    pub(super) fn push_text(&mut self, pos: Vec2, color: u32, args: std::fmt::Arguments<'_>) {
        let mut text = self.text_pool.acquire(|t| t.init(pos, color, args));
        // Slight lateral drift keeps stacked popups readable
        text.vel.x = self.rng.random_range(-15.0..15.0);
        self.texts.push(text);
    }

    /// Persist the score if it beats the stored best. The guard also
    /// makes repeated submissions of the same run a no-op.
    pub(super) fn submit_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save(self.score);
        }
    }

    /// Flat view of the world for the renderer.
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut entities = Vec::with_capacity(
            1 + self.hostiles.len()
                + self.projectiles.len()
                + self.pickups.len()
                + usize::from(self.boss.is_some()),
        );
        entities.push(EntityView {
            kind: ViewKind::Agent,
            pos: self.agent.pos,
            radius: self.agent.radius,
            color: self.agent.color,
        });
        for h in &self.hostiles {
            entities.push(EntityView {
                kind: match h.kind {
                    HostileKind::Chaser => ViewKind::Chaser,
                    HostileKind::Seeker => ViewKind::Seeker,
                },
                pos: h.pos,
                radius: h.radius,
                color: h.color,
            });
        }
        if let Some(boss) = &self.boss {
            entities.push(EntityView {
                kind: ViewKind::Boss,
                pos: boss.pos,
                radius: boss.radius,
                color: BOSS_COLOR,
            });
        }
        for p in &self.projectiles {
            entities.push(EntityView {
                kind: match p.kind {
                    ProjectileKind::Bolt => ViewKind::Bolt,
                    ProjectileKind::Rocket => ViewKind::Rocket,
                },
                pos: p.pos,
                radius: p.radius,
                color: p.color,
            });
        }
        for p in &self.pickups {
            entities.push(EntityView {
                kind: ViewKind::Pickup,
                pos: p.pos,
                radius: p.radius,
                color: p.color,
            });
        }

        let particles = self
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                radius: p.radius,
                color: p.color,
                alpha: p.life.clamp(0.0, 1.0),
            })
            .collect();

        let texts = self
            .texts
            .iter()
            .map(|t| TextView {
                pos: t.pos,
                label: t.label.clone(),
                color: t.color,
                alpha: (t.life / TEXT_LIFETIME).clamp(0.0, 1.0),
            })
            .collect();

        RenderSnapshot {
            phase: self.phase,
            camera: self.camera,
            shake: self.shake,
            entities,
            particles,
            texts,
            hud: Hud {
                score: self.score,
                high_score: self.high_score,
                level: self.agent.level,
                xp: self.agent.xp,
                xp_to_next: self.agent.xp_to_next,
                hp: self.agent.hp,
                max_hp: self.agent.max_hp,
                boss_hp: self.boss.as_ref().map(|b| (b.hp, b.max_hp)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::highscores::MemoryScoreStore;

    fn world() -> World {
        World::new(7, Box::new(NullAudio), Box::new(MemoryScoreStore::default()))
    }

    #[test]
    fn new_world_loads_high_score() {
        let w = World::new(
            1,
            Box::new(NullAudio),
            Box::new(MemoryScoreStore::with_score(9000)),
        );
        assert_eq!(w.high_score, 9000);
        assert_eq!(w.phase, GamePhase::Menu);
    }

    #[test]
    fn start_spawns_initial_wave() {
        let mut w = world();
        w.start();
        assert_eq!(w.phase, GamePhase::Playing);
        assert_eq!(w.hostiles.len(), INITIAL_HOSTILES as usize);
        assert!(w.boss.is_none());
    }

    #[test]
    fn restart_clears_stale_session_state() {
        let mut w = world();
        w.start();
        w.agent.install_weapon(super::super::weapon::WeaponKind::Rocket);
        w.score = 1234;
        w.play_time = 59.0;
        w.boss = Some(Boss::spawn(Vec2::ZERO));

        w.start();
        assert_eq!(w.agent.weapon, super::super::weapon::WeaponKind::Default);
        assert_eq!(w.agent.weapon_timer, 0.0);
        assert_eq!(w.score, 0);
        assert_eq!(w.play_time, 0.0);
        assert!(w.boss.is_none());
        assert!(w.texts.is_empty());
    }

    #[test]
    fn pause_round_trips_through_boss_fight() {
        let mut w = world();
        w.start();
        w.phase = GamePhase::BossFight;

        w.toggle_pause();
        assert_eq!(w.phase, GamePhase::Paused);
        w.toggle_pause();
        assert_eq!(w.phase, GamePhase::BossFight);
    }

    #[test]
    fn fire_is_ignored_outside_a_session() {
        let mut w = world();
        w.fire();
        assert!(w.projectiles.is_empty());

        w.start();
        w.set_target(Vec2::new(100.0, 0.0));
        w.fire();
        assert_eq!(w.projectiles.len(), 1);

        w.toggle_pause();
        w.fire();
        assert_eq!(w.projectiles.len(), 1);
    }

    #[test]
    fn joystick_overrides_keys() {
        let input = InputState {
            up: true,
            joystick: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::X);

        let keys_only = InputState {
            up: true,
            ..Default::default()
        };
        assert_eq!(keys_only.direction(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn diagonal_keys_normalize() {
        let input = InputState {
            up: true,
            right: true,
            ..Default::default()
        };
        assert!((input.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn submit_score_saves_only_improvements() {
        let store = MemoryScoreStore::with_score(100);
        let mut w = World::new(1, Box::new(NullAudio), Box::new(store.clone()));
        w.score = 50;
        w.submit_score();
        assert_eq!(store.saves(), 0);

        w.score = 150;
        w.submit_score();
        w.submit_score();
        assert_eq!(store.saves(), 1, "same run never saves twice");
        assert_eq!(store.load(), 150);
    }

    #[test]
    fn snapshot_reflects_world_contents() {
        let mut w = world();
        w.start();
        w.boss = Some(Boss::spawn(Vec2::new(500.0, 0.0)));
        let snap = w.snapshot();

        assert_eq!(snap.hud.boss_hp, Some((BOSS_HP, BOSS_HP)));
        assert_eq!(
            snap.entities.len(),
            1 + INITIAL_HOSTILES as usize + 1 // agent + wave + boss
        );
        assert!(snap.entities.iter().any(|e| e.kind == ViewKind::Boss));
        assert!(snap.particles.is_empty(), "debris rides its own list");
        // Snapshots serialize for out-of-process renderers
        assert!(serde_json::to_string(&snap).is_ok());
    }
}
