//! Forces applied to every live particle each step.
//!
//! Integration is semi-implicit Euler: velocity is updated first and the
//! new velocity moves the particle.

use glam::Vec3;

use crate::config::Config;
use crate::particle::Particle;

/// Gravity with optional linear drag and constant wind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceField {
    /// Downward acceleration magnitude.
    pub gravity: f32,
    /// Linear drag coefficient (per second).
    pub drag: f32,
    /// Constant acceleration, typically horizontal.
    pub wind: Vec3,
}

impl ForceField {
    /// Pure gravity, no drag or wind.
    pub fn gravity(magnitude: f32) -> Self {
        Self {
            gravity: magnitude,
            drag: 0.0,
            wind: Vec3::ZERO,
        }
    }

    /// Field described by a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            gravity: config.gravity(),
            drag: config.drag(),
            wind: config.wind(),
        }
    }

    /// Speed at which drag cancels gravity, or infinity without drag.
    pub fn terminal_speed(&self) -> f32 {
        if self.drag > 0.0 {
            self.gravity / self.drag
        } else {
            f32::INFINITY
        }
    }

    /// Accelerate and move every live particle over `dt` seconds.
    pub fn apply(&self, particles: &mut [Particle], dt: f32) {
        let constant = Vec3::NEG_Y * self.gravity + self.wind;
        for p in particles.iter_mut().filter(|p| p.alive) {
            let accel = constant - p.velocity * self.drag;
            p.velocity += accel * dt;
            p.position += p.velocity * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_accelerates_down() {
        let field = ForceField::gravity(9.8);
        let mut particles = [Particle::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO)];
        field.apply(&mut particles, 0.5);

        assert!((particles[0].velocity.y + 4.9).abs() < 1e-6);
        assert!((particles[0].position.y - (10.0 - 2.45)).abs() < 1e-5);
        assert_eq!(particles[0].velocity.x, 0.0);
    }

    #[test]
    fn test_dead_particles_are_untouched() {
        let field = ForceField::gravity(9.8);
        let mut dead = Particle::new(Vec3::Y, Vec3::X);
        dead.alive = false;
        let mut particles = [dead];
        field.apply(&mut particles, 1.0);
        assert_eq!(particles[0], dead);
    }

    #[test]
    fn test_downward_speed_never_decreases_without_drag() {
        let field = ForceField::gravity(9.8);
        let mut particles = [Particle::new(Vec3::ZERO, Vec3::new(0.1, -3.0, 0.0))];
        let mut last = -particles[0].velocity.y;
        for _ in 0..100 {
            field.apply(&mut particles, 1.0 / 24.0);
            let down = -particles[0].velocity.y;
            assert!(down >= last);
            last = down;
        }
    }

    #[test]
    fn test_drag_approaches_terminal_speed() {
        let field = ForceField {
            gravity: 9.0,
            drag: 0.6,
            wind: Vec3::ZERO,
        };
        let mut particles = [Particle::new(Vec3::ZERO, Vec3::NEG_Y)];
        let mut last = 1.0;
        for _ in 0..2000 {
            field.apply(&mut particles, 1.0 / 24.0);
            let down = -particles[0].velocity.y;
            assert!(down >= last - 1e-5);
            assert!(down <= field.terminal_speed() + 1e-3);
            last = down;
        }
        assert!((last - field.terminal_speed()).abs() < 0.01);
    }

    #[test]
    fn test_wind_pushes_sideways() {
        let field = ForceField {
            gravity: 9.8,
            drag: 0.0,
            wind: Vec3::new(2.0, 0.0, 0.0),
        };
        let mut particles = [Particle::new(Vec3::ZERO, Vec3::ZERO)];
        field.apply(&mut particles, 1.0);
        assert_eq!(particles[0].velocity.x, 2.0);
    }
}
