//! Entities and the arena that owns them.
//!
//! Targets and particles live in index-stable arenas inside the world.
//! Everything outside the world refers to them by [`EntityHandle`].

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(u64);

impl EntityHandle {
    pub fn raw(self) -> u64 { self.0 }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Target,
    Particle,
}

// ════════════════════════════════════════════════════════════════════════════
// Target
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub position:       Vec3,
    /// Euler angles, radians.
    pub rotation:       Vec3,
    pub scale:          f32,
    /// World units per second.
    pub velocity:       Vec3,
    /// Primary spin, rad/s about z (x turns at half this rate).
    pub spin:           f32,
    /// Secondary spin, rad/s about y.
    pub spin_secondary: f32,
    /// Effective (slow-motion scaled) seconds since spawn.
    pub age:            f32,
}

impl Target {
    /// A target that sits still at `position`.
    pub fn stationary(position: Vec3, scale: f32) -> Self {
        Target {
            position,
            rotation:       Vec3::ZERO,
            scale,
            velocity:       Vec3::ZERO,
            spin:           0.0,
            spin_secondary: 0.0,
            age:            0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.rotation.z += self.spin * dt;
        self.rotation.x += self.spin * 0.5 * dt;
        self.rotation.y += self.spin_secondary * dt;
        self.age += dt;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

pub const PARTICLE_SIZE:       f32 = 0.5;
/// Life lost per (effective) second.
pub const PARTICLE_DECAY_RATE: f32 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 1.0 at birth, removed at ≤ 0.
    pub life:     f32,
    /// Scale of the target that burst.
    pub scale:    f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, scale: f32) -> Self {
        Particle { position, velocity, life: 1.0, scale }
    }

    /// Returns `false` once the particle has burnt out.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.position += self.velocity * dt;
        self.life -= PARTICLE_DECAY_RATE * dt;
        self.life > 0.0
    }

    pub fn opacity(&self) -> f32 { self.life.clamp(0.0, 1.0) }

    pub fn size(&self) -> f32 { PARTICLE_SIZE * self.scale * self.opacity() }
}

// ════════════════════════════════════════════════════════════════════════════
// Arena
// ════════════════════════════════════════════════════════════════════════════

/// Insertion-ordered store with stable handles. Handles are never reused.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    next:  u64,
    slots: Vec<(EntityHandle, T)>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self { Arena { next: 0, slots: Vec::new() } }
}

impl<T> Arena<T> {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, value: T) -> EntityHandle {
        let h = EntityHandle(self.next);
        self.next += 1;
        self.slots.push((h, value));
        h
    }

    pub fn get(&self, h: EntityHandle) -> Option<&T> {
        self.slots.iter().find(|(k, _)| *k == h).map(|(_, v)| v)
    }

    pub fn remove(&mut self, h: EntityHandle) -> Option<T> {
        let idx = self.slots.iter().position(|(k, _)| *k == h)?;
        Some(self.slots.remove(idx).1)
    }

    /// Remove every entry matching `pred`, preserving the order of the rest.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<(EntityHandle, T)> {
        let mut kept = Vec::with_capacity(self.slots.len());
        let mut gone = Vec::new();
        for (h, v) in self.slots.drain(..) {
            if pred(&v) { gone.push((h, v)) } else { kept.push((h, v)) }
        }
        self.slots = kept;
        gone
    }

    pub fn drain(&mut self) -> Vec<(EntityHandle, T)> {
        std::mem::take(&mut self.slots)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &T)> {
        self.slots.iter().map(|(h, v)| (*h, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut T)> {
        self.slots.iter_mut().map(|(h, v)| (*h, v))
    }

    pub fn len(&self) -> usize { self.slots.len() }
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }
}
