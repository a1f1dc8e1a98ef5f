//! Particles and the store that owns them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single precipitation particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Position in world space.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Seconds since the particle was emitted.
    pub age: f32,
    /// Cleared by collisions and expiry; the store culls dead particles.
    pub alive: bool,
}

impl Particle {
    /// A fresh, living particle.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            age: 0.0,
            alive: true,
        }
    }

    /// Whether position and velocity are both finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Owner of every live particle.
///
/// Particles are kept in insertion order until the first cull. Culling
/// swaps the last particle into each hole, so order afterwards is not
/// meaningful.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    max_age: f32,
}

impl ParticleStore {
    /// Empty store whose particles expire after `max_age` seconds.
    pub fn new(max_age: f32) -> Self {
        Self {
            particles: Vec::new(),
            max_age,
        }
    }

    /// Take ownership of newly emitted particles.
    pub fn add(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Remove every particle whose `alive` flag is cleared.
    ///
    /// Returns how many were removed.
    pub fn cull_dead(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].alive {
                i += 1;
            } else {
                self.particles.swap_remove(i);
                removed += 1;
            }
        }
        removed
    }

    /// Advance every particle's age by `dt` and drop those past the maximum.
    ///
    /// Returns how many expired.
    pub fn age(&mut self, dt: f32) -> usize {
        let max_age = self.max_age;
        for p in &mut self.particles {
            p.age += dt;
            if p.age > max_age {
                p.alive = false;
            }
        }
        self.cull_dead()
    }

    /// Every particle currently held.
    pub fn all(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view handed to forces and collision surfaces for one step.
    pub fn all_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles held.
    pub fn count(&self) -> usize {
        self.particles.len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Age past which particles expire.
    pub fn max_age(&self) -> f32 {
        self.max_age
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Positions of all particles, in store order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }
}
