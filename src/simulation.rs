//! Simulation stepper.
//!
//! A [`Simulation`] moves through three states:
//!
//! ```text
//!            start()            stop() / time limit / step fault
//!   Idle ─────────────▶ Running ──────────────────────────────▶ Stopped
//!    ▲                  │    ▲                                    │
//!    │                  └────┘ step(dt)                           │
//!    └────────────────────────── reset() ─────────────────────────┘
//! ```
//!
//! Each `step(dt)` runs the pipeline in a fixed order:
//! emit, add to store, apply forces, resolve collisions, cull dead, age.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionPlane;
use crate::config::Config;
use crate::emitter::{Emitter, MAX_SPAWN_PER_STEP};
use crate::error::{SimulationError, StepError};
use crate::force::ForceField;
use crate::particle::ParticleStore;
use crate::time::Time;

/// Lifecycle state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimState {
    /// Built but not started; the store is empty.
    Idle,
    /// Accepting steps.
    Running,
    /// Finished, stopped or failed; steps are ignored until reset.
    Stopped,
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based index of the step.
    pub step_index: u64,
    /// Simulated seconds after the step.
    pub time: f64,
    /// Live particles after the step.
    pub particle_count: usize,
    /// Particles emitted during the step.
    pub spawned: usize,
    /// Particles that hit the collision surface.
    pub collided: usize,
    /// Particles removed for exceeding the maximum age.
    pub expired: usize,
    /// Particle positions after the step, in store order. Empty when
    /// position recording is turned off.
    pub positions: Vec<Vec3>,
}

/// Result of a call to [`Simulation::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The simulation advanced.
    Advanced(StepRecord),
    /// The simulation was stopped, nothing happened.
    Skipped,
}

impl StepOutcome {
    /// The record, if the step ran.
    pub fn record(&self) -> Option<&StepRecord> {
        match self {
            StepOutcome::Advanced(record) => Some(record),
            StepOutcome::Skipped => None,
        }
    }

    /// Take the record, if the step ran.
    pub fn into_record(self) -> Option<StepRecord> {
        match self {
            StepOutcome::Advanced(record) => Some(record),
            StepOutcome::Skipped => None,
        }
    }
}

/// A rain or snow simulation built from a validated [`Config`].
///
/// # Example
///
/// ```ignore
/// let config = Config::preset(WeatherKind::Rain, 100)?;
/// let mut sim = Simulation::new(config).with_time_limit(Some(50.0 / 24.0));
/// sim.start()?;
/// while sim.state() == SimState::Running {
///     sim.step(1.0 / 24.0)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
    emitter: Emitter,
    forces: ForceField,
    ground: CollisionPlane,
    store: ParticleStore,
    time: Time,
    state: SimState,
    record_positions: bool,
}

impl Simulation {
    /// Idle simulation with the configuration's emitter and forces and the
    /// default ground plane.
    pub fn new(config: Config) -> Self {
        Self {
            emitter: Emitter::new(&config),
            forces: ForceField::from_config(&config),
            ground: CollisionPlane::ground(),
            store: ParticleStore::new(config.max_age()),
            time: Time::new(),
            state: SimState::Idle,
            record_positions: true,
            config,
        }
    }

    /// Replace the emitter.
    pub fn with_emitter(mut self, emitter: Emitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Replace the force field.
    pub fn with_forces(mut self, forces: ForceField) -> Self {
        self.forces = forces;
        self
    }

    /// Replace the collision surface.
    pub fn with_ground(mut self, ground: CollisionPlane) -> Self {
        self.ground = ground;
        self
    }

    /// Stop automatically once this much simulated time has passed.
    pub fn with_time_limit(mut self, seconds: Option<f64>) -> Self {
        self.time = self.time.with_limit(seconds);
        self
    }

    /// Whether step records carry particle positions (on by default).
    pub fn with_positions(mut self, record_positions: bool) -> Self {
        self.record_positions = record_positions;
        self
    }

    /// Current state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Configuration the simulation was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Live particles.
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Simulated time.
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Number of live particles.
    pub fn particle_count(&self) -> usize {
        self.store.count()
    }

    /// Begin accepting steps.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.state != SimState::Idle {
            return Err(SimulationError::AlreadyStarted);
        }
        self.state = SimState::Running;
        tracing::info!(
            kind = %self.config.kind(),
            rate = self.config.rate(),
            shape = %self.config.shape(),
            style = %self.config.style(),
            "simulation started"
        );
        Ok(())
    }

    /// Stop accepting steps.
    pub fn stop(&mut self) {
        if self.state == SimState::Running {
            self.state = SimState::Stopped;
            tracing::info!(step = self.time.frame(), "simulation stopped");
        }
    }

    /// Clear all particles and time and go back to `Idle`.
    pub fn reset(&mut self) {
        self.store.clear();
        self.emitter.reset();
        self.time.reset();
        self.state = SimState::Idle;
        tracing::info!("simulation reset");
    }

    /// Advance by `dt` seconds.
    ///
    /// On a stopped simulation this does nothing and returns
    /// [`StepOutcome::Skipped`]. A fault stops the simulation and is
    /// returned with the index of the failing step.
    pub fn step(&mut self, dt: f32) -> Result<StepOutcome, SimulationError> {
        match self.state {
            SimState::Idle => return Err(SimulationError::NotStarted),
            SimState::Stopped => {
                tracing::warn!(
                    step = self.time.frame(),
                    "step requested on a stopped simulation, ignoring"
                );
                return Ok(StepOutcome::Skipped);
            }
            SimState::Running => {}
        }

        let step_index = self.time.frame() + 1;
        match self.advance(dt, step_index) {
            Ok(record) => {
                if self.time.is_finished() {
                    self.state = SimState::Stopped;
                    tracing::info!(
                        step = step_index,
                        elapsed = self.time.elapsed(),
                        "time limit reached"
                    );
                }
                Ok(StepOutcome::Advanced(record))
            }
            Err(source) => {
                self.state = SimState::Stopped;
                tracing::error!(
                    step = step_index,
                    error = %source,
                    "step failed, simulation stopped"
                );
                Err(SimulationError::Step {
                    step: step_index,
                    source,
                })
            }
        }
    }

    fn advance(&mut self, dt: f32, step_index: u64) -> Result<StepRecord, StepError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(StepError::InvalidTimeStep(dt));
        }
        let requested = self.emitter.pending(dt);
        if requested > MAX_SPAWN_PER_STEP {
            return Err(StepError::TooManySpawns {
                requested,
                limit: MAX_SPAWN_PER_STEP,
            });
        }

        let spawned = self.emitter.emit(dt);
        let spawned_count = spawned.len();
        self.store.add(spawned);

        self.forces.apply(self.store.all_mut(), dt);
        if let Some(index) = self.store.all().iter().position(|p| !p.is_finite()) {
            return Err(StepError::NonFiniteParticle { index });
        }

        let collided = self.ground.resolve(self.store.all_mut());
        self.store.cull_dead();
        let expired = self.store.age(dt);
        self.time.advance(dt);

        tracing::debug!(
            step = step_index,
            spawned = spawned_count,
            collided,
            expired,
            live = self.store.count(),
            "step complete"
        );

        Ok(StepRecord {
            step_index,
            time: self.time.elapsed(),
            particle_count: self.store.count(),
            spawned: spawned_count,
            collided,
            expired,
            positions: if self.record_positions {
                self.store.positions()
            } else {
                Vec::new()
            },
        })
    }
}
