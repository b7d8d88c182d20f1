//! # void_world
//!
//! A frame-driven 3-D target gallery. Targets spawn deep in the scene, fly
//! toward the camera and are destroyed by rays cast from screen-space
//! triggers. Chaining hits builds a combo that scales points and briefly
//! slows the world down.
//!
//! ```text
//!   TriggerEvent[] ──apply_triggers──▶ ┌───────────┐ ──▶ WorldListener
//!   (now_ms, dt)   ──────tick────────▶ │ GameWorld │      on_score / on_miss
//!                                       └───────────┘      on_game_over / spawned / removed
//! ```
//!
//! Rendering is left to the caller, which reads [`GameWorld::targets`] and
//! [`GameWorld::particles`] and projects them through [`GameWorld::camera`].

pub mod camera;
pub mod entity;
pub mod session;
pub mod slowmo;
pub mod tuning;
pub mod world;

pub use camera::{Camera, Ray};
pub use entity::{Arena, EntityHandle, EntityKind, Particle, Target};
pub use session::{GameSession, MissOutcome};
pub use slowmo::SlowMotion;
pub use tuning::{ControlMode, Difficulty, DifficultyTuning};
pub use world::{GameWorld, NullListener, WorldConfig, WorldListener, WorldState};
