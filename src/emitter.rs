//! Particle emitters.
//!
//! An [`Emitter`] turns a spawn rate into whole particles step by step.
//! Fixed time steps rarely line up with the rate (100/s at 24 steps/s is
//! 4.1666 per step), so the fractional part is carried into the next call
//! and the long-run count stays within one particle of `rate * time`.
//!
//! # Shapes
//!
//! | Shape | Spawn position |
//! |-------|----------------|
//! | [`EmitterShape::Omni`] | The origin itself |
//! | [`EmitterShape::Distributed`] | Uniform over a 25 x 25 square at the origin's height |
//! | [`EmitterShape::Volume`] | Uniform inside a 25 x 2 x 25 box around the origin |
//!
//! Every shape launches particles straight down at the weather kind's
//! speed, with a small uniform horizontal jitter.

use glam::Vec3;

use crate::config::{Config, EmitterShape};
use crate::particle::Particle;
use crate::spawn::SpawnContext;

/// Half-size of the horizontal spawn area, matching the 25 x 25 ground.
pub const AREA_HALF_SIZE: f32 = 12.5;

/// Half-extents of the spawn volume.
pub const VOLUME_HALF_EXTENTS: Vec3 = Vec3::new(12.5, 1.0, 12.5);

/// Most particles a single `emit` call will produce.
pub const MAX_SPAWN_PER_STEP: usize = 1 << 20;

/// Spawns particles at a fixed rate.
#[derive(Debug, Clone)]
pub struct Emitter {
    shape: EmitterShape,
    rate: u32,
    origin: Vec3,
    speed: f32,
    spread: f32,
    carry: f32,
    ctx: SpawnContext,
}

impl Emitter {
    /// Emitter for a validated configuration.
    pub fn new(config: &Config) -> Self {
        let kind = config.kind();
        Self {
            shape: config.shape(),
            rate: config.rate(),
            origin: config.origin(),
            speed: kind.emission_speed(),
            spread: kind.horizontal_spread(),
            carry: 0.0,
            ctx: SpawnContext::new(config.seed()),
        }
    }

    /// Override the emission rate. Any value is accepted here, including 0.
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Particles per second.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Spawn shape.
    pub fn shape(&self) -> EmitterShape {
        self.shape
    }

    /// Fractional particle owed to the next call, in `[0, 1)`.
    pub fn carry(&self) -> f32 {
        self.carry
    }

    /// How many whole particles are due over the next `dt` seconds,
    /// before the per-call cap. Saturates at `usize::MAX`.
    pub fn pending(&self, dt: f32) -> usize {
        ((self.rate as f32 * dt).max(0.0) + self.carry).floor() as usize
    }

    /// Spawn the particles due over `dt` seconds.
    ///
    /// At most [`MAX_SPAWN_PER_STEP`] particles come out of one call; any
    /// excess is dropped. A `dt` that makes the expected count non-finite
    /// spawns nothing.
    pub fn emit(&mut self, dt: f32) -> Vec<Particle> {
        let expected = (self.rate as f32 * dt).max(0.0) + self.carry;
        if !expected.is_finite() {
            return Vec::new();
        }
        let whole = expected.floor();
        self.carry = expected - whole;

        let count = (whole as usize).min(MAX_SPAWN_PER_STEP);
        (0..count).map(|_| self.spawn_one()).collect()
    }

    /// Forget any carried fraction and rewind the random sequence.
    pub fn reset(&mut self) {
        self.carry = 0.0;
        self.ctx.reset();
    }

    fn spawn_one(&mut self) -> Particle {
        let offset = match self.shape {
            EmitterShape::Omni => Vec3::ZERO,
            EmitterShape::Distributed => self.ctx.random_in_square(AREA_HALF_SIZE),
            EmitterShape::Volume => self.ctx.random_in_box(VOLUME_HALF_EXTENTS),
        };

        let jitter = self.spread * self.speed;
        let velocity = Vec3::new(
            self.ctx.random_symmetric(jitter),
            -self.speed,
            self.ctx.random_symmetric(jitter),
        );

        Particle::new(self.origin + offset, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate, WeatherKind, DEFAULT_ORIGIN};
    use crate::visuals::RenderStyle;

    fn rain(shape: EmitterShape, rate: i64) -> Emitter {
        Emitter::new(&validate(WeatherKind::Rain, rate, shape, RenderStyle::Points).unwrap())
    }

    #[test]
    fn test_carry_over_keeps_count_accurate() {
        let mut emitter = rain(EmitterShape::Omni, 100);
        let dt = 1.0 / 24.0;
        let mut total = 0usize;
        for step in 1..=1000 {
            total += emitter.emit(dt).len();
            let expected = 100.0 * dt as f64 * step as f64;
            // f32 accumulation may land a hair under an exact integer
            let drift = (total as f64 - expected).abs();
            assert!(drift < 1.001, "step {step}: {total} vs {expected}");
        }
    }

    #[test]
    fn test_small_dt_accumulates() {
        let mut emitter = rain(EmitterShape::Omni, 50);
        // 0.5 particles per call
        assert_eq!(emitter.emit(0.01).len(), 0);
        assert_eq!(emitter.emit(0.01).len(), 1);
        assert!(emitter.carry() < 1e-4);
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let mut emitter = rain(EmitterShape::Volume, 100).with_rate(0);
        for _ in 0..100 {
            assert!(emitter.emit(1.0).is_empty());
        }
    }

    #[test]
    fn test_omni_spawns_at_origin() {
        let mut emitter = rain(EmitterShape::Omni, 240);
        let particles = emitter.emit(0.1);
        assert_eq!(particles.len(), 24);
        for p in particles {
            assert_eq!(p.position, DEFAULT_ORIGIN);
            assert_eq!(p.velocity.y, -WeatherKind::Rain.emission_speed());
            assert!(p.alive);
            assert_eq!(p.age, 0.0);
        }
    }

    #[test]
    fn test_distributed_spawns_on_flat_square() {
        let mut emitter = rain(EmitterShape::Distributed, 1000);
        for p in emitter.emit(1.0) {
            assert_eq!(p.position.y, DEFAULT_ORIGIN.y);
            assert!(p.position.x.abs() <= AREA_HALF_SIZE);
            assert!(p.position.z.abs() <= AREA_HALF_SIZE);
        }
    }

    #[test]
    fn test_volume_spawns_inside_box() {
        let mut emitter = rain(EmitterShape::Volume, 1000);
        let particles = emitter.emit(1.0);
        assert!(particles.iter().any(|p| p.position.y != DEFAULT_ORIGIN.y));
        for p in particles {
            let local = p.position - DEFAULT_ORIGIN;
            assert!(local.abs().cmple(VOLUME_HALF_EXTENTS).all());
        }
    }

    #[test]
    fn test_snow_falls_slower_than_rain() {
        let snow =
            validate(WeatherKind::Snow, 500, EmitterShape::Distributed, RenderStyle::Cloud)
                .unwrap();
        let mut emitter = Emitter::new(&snow);
        let flakes = emitter.emit(1.0);
        let max_drift = flakes.iter().map(|p| p.velocity.x.abs()).fold(0.0, f32::max);
        let snow_jitter =
            WeatherKind::Snow.emission_speed() * WeatherKind::Snow.horizontal_spread();

        let drops = rain(EmitterShape::Distributed, 500).emit(1.0);
        assert!(flakes[0].velocity.y > drops[0].velocity.y);
        assert!(max_drift <= snow_jitter);
    }

    #[test]
    fn test_pending_matches_next_emit() {
        let mut emitter = rain(EmitterShape::Omni, 100);
        let dt = 1.0 / 24.0;
        for _ in 0..30 {
            let due = emitter.pending(dt);
            assert_eq!(emitter.emit(dt).len(), due);
        }
        assert_eq!(emitter.pending(f32::INFINITY), usize::MAX);
    }

    #[test]
    fn test_emit_is_capped_per_call() {
        let mut emitter = rain(EmitterShape::Omni, 2_000_000);
        assert!(emitter.pending(1.0) > MAX_SPAWN_PER_STEP);
        assert_eq!(emitter.emit(1.0).len(), MAX_SPAWN_PER_STEP);
        assert!(emitter.carry() < 1.0);
    }

    #[test]
    fn test_reset_replays_same_particles() {
        let mut emitter = rain(EmitterShape::Distributed, 100);
        let first = emitter.emit(0.5);
        emitter.reset();
        assert_eq!(emitter.emit(0.5), first);
    }
}
