//! Real-time simulation
//!
//! All gameplay lives here: entity model, object pools, spatial index,
//! weapon and boss behavior, and the per-frame [`World::advance`] step.
//! The module is deterministic given a seed and an input stream, and
//! has no rendering or platform dependencies.

pub mod boss;
pub mod entity;
pub mod grid;
pub mod pool;
pub mod state;
pub mod tick;
pub mod weapon;

pub use boss::{Boss, BossPhase};
pub use entity::{
    Agent, FloatingText, Hostile, HostileKind, Particle, Pickup, PickupKind, Projectile,
    ProjectileKind,
};
pub use grid::{GridRef, SpatialGrid};
pub use pool::ObjectPool;
pub use state::{
    EntityView, GamePhase, Hud, InputState, ParticleView, RenderSnapshot, TextView, ViewKind, World,
};
pub use weapon::WeaponKind;
