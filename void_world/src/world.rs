//! The game world: spawning, kinematics, hit detection, effects.
//!
//! Driven once per rendered frame by [`GameWorld::tick`] and once per
//! gameplay routing pass by [`GameWorld::apply_triggers`]. Time comes in from
//! the caller (`now_ms` wall clock, `dt` seconds) so the world never reads a
//! clock itself.
//!
//! ```text
//!  Idle ──set_active(true)──▶ Running ◀──set_active(true)── Paused
//!    ▲                          │  └────set_active(false)──▶  │
//!    └─────── last life lost ───┘                              │
//!    └──────────────────────── reset() ◀───────────────────────┘
//! ```

use std::collections::HashMap;

use glam::Vec3;
use hand_intent::TriggerEvent;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::camera::Camera;
use crate::entity::{Arena, EntityHandle, EntityKind, Particle, Target};
use crate::session::{GameSession, MissOutcome};
use crate::slowmo::SlowMotion;
use crate::tuning::{ControlMode, Difficulty};

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// Targets whose z passes this plane have escaped.
pub const EXIT_PLANE_Z:           f32 = 45.0;
pub const SPAWN_Z_NEAR:           f32 = -50.0;
/// Spawn depth is `SPAWN_Z_NEAR - rand × SPAWN_Z_SPREAD`.
pub const SPAWN_Z_SPREAD:         f32 = 40.0;
/// Fraction of the visible plane used for spawn positions.
pub const SPAWN_AREA_FRACTION:    f32 = 0.8;
/// rad/s, symmetric around zero.
pub const SPIN_RANGE:             f32 = 4.5;
pub const SPIN_SECONDARY_RANGE:   f32 = 3.0;

pub const BASE_HIT_RADIUS:        f32 = 5.0;
pub const HIT_REFERENCE_DISTANCE: f32 = 50.0;
pub const MIN_HIT_DISTANCE:       f32 = 10.0;
pub const HIT_LENIENCY:           f32 = 2.0;

pub const PARTICLES_PER_SCALE:    f32 = 15.0;
/// Each velocity axis is uniform in ±this.
pub const PARTICLE_SPEED:         f32 = 12.5;

/// Generous collision radius for a target `distance` from the camera.
pub fn hit_radius(distance: f32, scale: f32) -> f32 {
    BASE_HIT_RADIUS * (distance.max(MIN_HIT_DISTANCE) / HIT_REFERENCE_DISTANCE) * scale * HIT_LENIENCY
}

// ════════════════════════════════════════════════════════════════════════════
// Listener
// ════════════════════════════════════════════════════════════════════════════

/// Outbound notifications. Every method has an empty default so a caller
/// only implements what it renders or plays.
pub trait WorldListener {
    /// A target was destroyed at `position` for `points`.
    fn on_score(&mut self, _position: Vec3, _points: u32) {}
    /// A target escaped past the camera.
    fn on_miss(&mut self, _lives_left: u32) {}
    /// The last life was lost; fires once per round.
    fn on_game_over(&mut self, _final_score: u64) {}
    /// A shot was taken while the world was running.
    fn on_fire(&mut self, _x: f32, _y: f32) {}
    fn spawned(&mut self, _handle: EntityHandle, _kind: EntityKind) {}
    fn removed(&mut self, _handle: EntityHandle, _kind: EntityKind) {}
}

/// Listener that ignores everything.
pub struct NullListener;

impl WorldListener for NullListener {}

// ════════════════════════════════════════════════════════════════════════════
// GameWorld
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldState {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldConfig {
    pub difficulty: Difficulty,
    pub mode:       ControlMode,
    /// Viewport width / height; `None` keeps the camera default.
    pub aspect:     Option<f32>,
}

pub struct GameWorld {
    state:         WorldState,
    difficulty:    Difficulty,
    mode:          ControlMode,
    camera:        Camera,
    targets:       Arena<Target>,
    particles:     Arena<Particle>,
    session:       GameSession,
    slow_mo:       SlowMotion,
    last_spawn_ms: u64,
    /// Trigger level per hand id from the previous batch.
    prev_triggers: HashMap<usize, bool>,
    rng:           StdRng,
}

impl GameWorld {
    pub fn new(cfg: WorldConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Deterministic spawns for tests and replays.
    pub fn with_seed(cfg: WorldConfig, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: WorldConfig, rng: StdRng) -> Self {
        let mut camera = Camera::default();
        if let Some(a) = cfg.aspect.filter(|a| a.is_finite() && *a > 0.0) {
            camera.aspect = a;
        }
        GameWorld {
            state:         WorldState::Idle,
            difficulty:    cfg.difficulty,
            mode:          cfg.mode,
            camera,
            targets:       Arena::new(),
            particles:     Arena::new(),
            session:       GameSession::new(),
            slow_mo:       SlowMotion::default(),
            last_spawn_ms: 0,
            prev_triggers: HashMap::new(),
            rng,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> WorldState { self.state }
    pub fn is_running(&self) -> bool { self.state == WorldState::Running }
    pub fn difficulty(&self) -> Difficulty { self.difficulty }
    pub fn mode(&self) -> ControlMode { self.mode }
    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn session(&self) -> &GameSession { &self.session }
    pub fn targets(&self) -> &Arena<Target> { &self.targets }
    pub fn particles(&self) -> &Arena<Particle> { &self.particles }

    pub fn time_scale(&self, now_ms: u64) -> f32 { self.slow_mo.time_scale(now_ms) }
    pub fn slow_motion_active(&self, now_ms: u64) -> bool { self.slow_mo.is_active(now_ms) }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }

    /// Change difficulty and mode; any entities in flight are discarded.
    pub fn configure(&mut self, difficulty: Difficulty, mode: ControlMode, listener: &mut impl WorldListener) {
        self.difficulty = difficulty;
        self.mode = mode;
        self.clear_entities(listener);
        debug!(%difficulty, %mode, "world configured");
    }

    /// Back to a fresh round: no entities, full lives, no slow motion.
    /// The spawn timer restarts at `now_ms`.
    pub fn reset(&mut self, now_ms: u64, listener: &mut impl WorldListener) {
        self.clear_entities(listener);
        self.session.reset();
        self.slow_mo.clear();
        self.prev_triggers.clear();
        self.last_spawn_ms = now_ms;
        self.state = WorldState::Idle;
        debug!("world reset");
    }

    /// Resume or pause. A finished round stays idle until [`reset`](Self::reset).
    pub fn set_active(&mut self, active: bool) {
        let next = match (self.state, active) {
            (_, true) if self.session.is_over() => WorldState::Idle,
            (_, true) => WorldState::Running,
            (WorldState::Running, false) => WorldState::Paused,
            (s, false) => s,
        };
        if next != self.state {
            info!(from = ?self.state, to = ?next, "world state");
            self.state = next;
        }
    }

    fn clear_entities(&mut self, listener: &mut impl WorldListener) {
        for (h, _) in self.targets.drain() {
            listener.removed(h, EntityKind::Target);
        }
        for (h, _) in self.particles.drain() {
            listener.removed(h, EntityKind::Particle);
        }
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    /// Advance the world by `dt` wall-clock seconds.
    ///
    /// Targets move, spawn and escape only while running. Particles always
    /// finish their animation so a burst fades out behind the pause screen.
    pub fn tick(&mut self, now_ms: u64, dt: f32, listener: &mut impl WorldListener) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let edt = dt * self.slow_mo.time_scale(now_ms);

        if self.state == WorldState::Running {
            self.maybe_spawn(now_ms, listener);
            for (_, t) in self.targets.iter_mut() {
                t.advance(edt);
            }
            self.collect_escaped(now_ms, listener);
        }

        for (_, p) in self.particles.iter_mut() {
            p.advance(edt);
        }
        for (h, _) in self.particles.remove_where(|p| p.life <= 0.0) {
            listener.removed(h, EntityKind::Particle);
        }
    }

    fn maybe_spawn(&mut self, now_ms: u64, listener: &mut impl WorldListener) {
        if !self.targets.is_empty() {
            return;
        }
        let delay = self.difficulty.tuning().spawn_delay_ms;
        if now_ms.saturating_sub(self.last_spawn_ms) < delay {
            return;
        }
        for _ in 0..self.mode.targets_per_spawn() {
            let t = self.random_target();
            self.insert_target(t, listener);
        }
        self.last_spawn_ms = now_ms;
    }

    fn random_target(&mut self) -> Target {
        let tuning = self.difficulty.tuning();
        let scale = self.rng.gen_range(tuning.scale);
        let start_z = SPAWN_Z_NEAR - self.rng.gen::<f32>() * SPAWN_Z_SPREAD;

        let (w, h) = self.camera.view_extent_at(start_z);
        let x = (self.rng.gen::<f32>() - 0.5) * w * SPAWN_AREA_FRACTION;
        let y = (self.rng.gen::<f32>() - 0.5) * h * SPAWN_AREA_FRACTION;

        // Aim at the camera's axis point so the target grows toward the lens.
        let travel = self.rng.gen_range(tuning.travel_secs);
        let velocity = Vec3::new(-x / travel, -y / travel, (self.camera.position.z - start_z) / travel);

        Target {
            position:       Vec3::new(x, y, start_z),
            rotation:       Vec3::ZERO,
            scale,
            velocity,
            spin:           self.rng.gen_range(-SPIN_RANGE..=SPIN_RANGE),
            spin_secondary: self.rng.gen_range(-SPIN_SECONDARY_RANGE..=SPIN_SECONDARY_RANGE),
            age:            0.0,
        }
    }

    /// Place a target directly (scripted waves, tests).
    pub fn insert_target(&mut self, target: Target, listener: &mut impl WorldListener) -> EntityHandle {
        let h = self.targets.insert(target);
        listener.spawned(h, EntityKind::Target);
        h
    }

    fn collect_escaped(&mut self, now_ms: u64, listener: &mut impl WorldListener) {
        let escaped = self.targets.remove_where(|t| t.position.z > EXIT_PLANE_Z);
        if escaped.is_empty() {
            return;
        }
        for (h, _) in escaped {
            listener.removed(h, EntityKind::Target);
            match self.session.record_miss() {
                MissOutcome::LifeLost { lives_left } => {
                    debug!(lives_left, "target escaped");
                    listener.on_miss(lives_left);
                }
                MissOutcome::GameOver => {
                    listener.on_miss(0);
                    info!(score = self.session.score(), "game over");
                    listener.on_game_over(self.session.score());
                    self.state = WorldState::Idle;
                }
                MissOutcome::AlreadyOver => listener.on_miss(0),
            }
        }
        self.last_spawn_ms = now_ms;
    }

    // ── Firing ───────────────────────────────────────────────────────────────

    /// Apply one batch of per-hand triggers. A hand fires on the frame its
    /// trigger goes from inactive to active. Ids missing from the batch keep
    /// their last level, so a held trigger that drops out for a frame does
    /// not fire again on return.
    pub fn apply_triggers(&mut self, triggers: &[TriggerEvent], now_ms: u64, listener: &mut impl WorldListener) {
        for t in triggers {
            let was = self.prev_triggers.insert(t.hand_id, t.active).unwrap_or(false);
            if t.active && !was {
                self.fire(t.x, t.y, now_ms, listener);
            }
        }
    }

    /// Shoot through screen point `(x, y)` (0.0–1.0, y down). Returns the
    /// destroyed target, if any. Ignored unless running.
    pub fn fire(&mut self, x: f32, y: f32, now_ms: u64, listener: &mut impl WorldListener) -> Option<EntityHandle> {
        if self.state != WorldState::Running {
            return None;
        }
        listener.on_fire(x, y);

        let ray = self.camera.ray_through(x, y);
        let cam_z = self.camera.position.z;

        let mut best: Option<(EntityHandle, f32)> = None;
        for (h, t) in self.targets.iter() {
            let along = ray.forward_distance(t.position);
            if along <= 0.0 {
                continue;
            }
            let miss_by = ray.at(along).distance(t.position);
            let radius = hit_radius((t.position.z - cam_z).abs(), t.scale);
            if miss_by < radius && best.map_or(true, |(_, d)| along < d) {
                best = Some((h, along));
            }
        }

        let (handle, _) = best?;
        let target = self.targets.remove(handle)?;
        listener.removed(handle, EntityKind::Target);

        if self.session.combo() > 0 {
            self.slow_mo.trigger(now_ms);
        }
        self.burst(target.position, target.scale, listener);
        let points = self.session.record_hit();
        debug!(points, combo = self.session.combo(), "target hit");
        listener.on_score(target.position, points);
        self.last_spawn_ms = now_ms;
        Some(handle)
    }

    fn burst(&mut self, at: Vec3, scale: f32, listener: &mut impl WorldListener) {
        let count = (PARTICLES_PER_SCALE * scale).floor() as usize;
        for _ in 0..count {
            let v = Vec3::new(
                self.rng.gen_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
                self.rng.gen_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
                self.rng.gen_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
            );
            let h = self.particles.insert(Particle::new(at, v, scale));
            listener.spawned(h, EntityKind::Particle);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
