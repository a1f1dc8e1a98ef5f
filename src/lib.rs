//! # weather-sim - Rain and Snow Particle Simulator
//!
//! A small, deterministic precipitation simulation with a simple,
//! declarative API.
//!
//! Pick a weather kind, an emission rate, an emitter shape and a render
//! style. The selection is validated once, then a [`Simulation`] emits
//! particles, pulls them down under gravity, removes them when they reach
//! the ground or grow too old, and reports what happened on every step.
//!
//! ## Quick Start
//!
//! ```ignore
//! use weather_sim::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let options = RunOptions::new(
//!         WeatherKind::Rain,
//!         100,
//!         EmitterShape::Omni,
//!         RenderStyle::Points,
//!         9.8,
//!         50,
//!         1.0 / 24.0,
//!     );
//!     let report = run(&options)?;
//!     println!("{} particles left", report.final_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Configuration
//!
//! Each weather kind offers its own emitter shapes and render styles:
//!
//! | Kind | Shapes | Styles |
//! |------|--------|--------|
//! | Rain | Omni, Distributed, Volume | Points, Sprites, Streak |
//! | Snow | Distributed | Multipoint, Multistreak, Cloud |
//!
//! [`validate`] rejects anything else, and a non-positive rate, before a
//! simulation exists. The resulting [`Config`] carries per-kind physical
//! defaults that can be tuned with its `with_*` builders.
//!
//! ### Stepping
//!
//! A [`Simulation`] is `Idle` until [`start`](Simulation::start)ed. Each
//! [`step`](Simulation::step) then runs, in order:
//!
//! 1. the [`Emitter`] spawns `rate * dt` particles, carrying the fraction over
//! 2. the [`ForceField`] integrates gravity, drag and wind
//! 3. the [`CollisionPlane`] removes (or bounces) particles that crossed it
//! 4. the [`ParticleStore`] ages particles and drops expired ones
//!
//! and returns a [`StepRecord`]. A time limit, [`stop`](Simulation::stop)
//! or a step fault moves the simulation to `Stopped`, where further steps
//! are ignored until [`reset`](Simulation::reset).
//!
//! ### Runs
//!
//! [`run`] and [`run_with`] wrap the whole lifecycle for a fixed number of
//! steps. [`RunOptions`] doubles as the JSON scenario format read by the
//! `weather-sim` binary.
//!
//! ## Determinism
//!
//! Random placement comes from a seeded generator and time only advances by
//! the `dt` handed to each step, so equal options always yield equal records.

pub mod collision;
pub mod config;
pub mod emitter;
pub mod error;
pub mod force;
pub mod particle;
pub mod run;
pub mod simulation;
pub mod spawn;
pub mod time;
pub mod visuals;

pub use collision::{CollisionPlane, CollisionResponse};
pub use config::{validate, Config, EmitterShape, WeatherKind};
pub use emitter::Emitter;
pub use error::{RunError, ScenarioError, SimulationError, StepError, ValidationError};
pub use force::ForceField;
pub use glam::Vec3;
pub use particle::{Particle, ParticleStore};
pub use run::{
    run, run_with, BinarySink, JsonLinesSink, RecordSink, RunOptions, RunReport, RunSummary,
};
pub use simulation::{SimState, Simulation, StepOutcome, StepRecord};
pub use spawn::SpawnContext;
pub use time::Time;
pub use visuals::{RenderHints, RenderStyle};

/// Everything needed for typical use.
pub mod prelude {
    pub use crate::collision::{CollisionPlane, CollisionResponse};
    pub use crate::config::{validate, Config, EmitterShape, WeatherKind};
    pub use crate::emitter::Emitter;
    pub use crate::error::{SimulationError, ValidationError};
    pub use crate::force::ForceField;
    pub use crate::particle::{Particle, ParticleStore};
    pub use crate::run::{run, run_with, RecordSink, RunOptions, RunReport};
    pub use crate::simulation::{SimState, Simulation, StepOutcome, StepRecord};
    pub use crate::time::Time;
    pub use crate::visuals::RenderStyle;
    pub use crate::Vec3;
}
