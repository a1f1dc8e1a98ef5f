//! Ground plane collision.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Half-size of the default ground: a 25 x 25 plane.
pub const GROUND_HALF_SIZE: f32 = 12.5;

/// What happens to a particle that crosses the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// The particle dies on contact.
    #[default]
    Vanish,
    /// The particle is put back on the plane and its normal velocity
    /// reflected, scaled by `restitution`.
    Bounce {
        /// Fraction of the normal speed kept after impact.
        restitution: f32,
    },
}

/// A plane `dot(p, normal) = height`, optionally limited to a square
/// footprint around `normal * height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPlane {
    height: f32,
    normal: Vec3,
    half_extent: Option<f32>,
    response: CollisionResponse,
}

impl CollisionPlane {
    /// Infinite plane. `normal` is normalized; a zero normal falls back to +Y.
    pub fn new(height: f32, normal: Vec3) -> Self {
        Self {
            height,
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
            half_extent: None,
            response: CollisionResponse::Vanish,
        }
    }

    /// The 25 x 25 ground at y = 0.
    pub fn ground() -> Self {
        Self::new(0.0, Vec3::Y).with_half_extent(GROUND_HALF_SIZE)
    }

    /// Limit collisions to a square of the given half-size on the plane.
    pub fn with_half_extent(mut self, half_extent: f32) -> Self {
        self.half_extent = Some(half_extent);
        self
    }

    /// Change the collision response.
    pub fn with_response(mut self, response: CollisionResponse) -> Self {
        self.response = response;
        self
    }

    /// Plane height along the normal.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance of a point above the plane.
    pub fn distance(&self, point: Vec3) -> f32 {
        point.dot(self.normal) - self.height
    }

    fn within_extent(&self, point: Vec3) -> bool {
        let Some(half) = self.half_extent else {
            return true;
        };
        let (u, v) = self.normal.any_orthonormal_pair();
        let local = point - self.normal * self.height;
        local.dot(u).abs() <= half && local.dot(v).abs() <= half
    }

    /// Handle every live particle that has crossed below the plane.
    ///
    /// Returns the number of particles that hit it.
    pub fn resolve(&self, particles: &mut [Particle]) -> usize {
        let mut hits = 0;
        for p in particles.iter_mut().filter(|p| p.alive) {
            let distance = self.distance(p.position);
            if distance >= 0.0 || !self.within_extent(p.position) {
                continue;
            }
            hits += 1;
            match self.response {
                CollisionResponse::Vanish => p.alive = false,
                CollisionResponse::Bounce { restitution } => {
                    p.position -= self.normal * distance;
                    let normal_speed = p.velocity.dot(self.normal);
                    if normal_speed < 0.0 {
                        p.velocity -= self.normal * normal_speed * (1.0 + restitution);
                    }
                }
            }
        }
        hits
    }
}

impl Default for CollisionPlane {
    fn default() -> Self {
        Self::ground()
    }
}
