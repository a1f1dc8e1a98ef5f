//! Error types for weather-sim.
//!
//! Configuration problems surface as [`ValidationError`] before any
//! simulation state exists. Faults found while stepping surface as
//! [`StepError`], wrapped in [`SimulationError::Step`] together with the
//! index of the step that failed.

use std::fmt;

use glam::Vec3;

use crate::config::{EmitterShape, WeatherKind};
use crate::visuals::RenderStyle;

/// Errors produced while validating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The emitter shape is not offered for this weather kind.
    ShapeNotAllowed {
        /// Selected weather kind.
        kind: WeatherKind,
        /// Rejected shape.
        shape: EmitterShape,
    },
    /// The render style is not offered for this weather kind.
    StyleNotAllowed {
        /// Selected weather kind.
        kind: WeatherKind,
        /// Rejected style.
        style: RenderStyle,
    },
    /// Emission rate was zero or negative.
    NonPositiveRate(i64),
    /// Emission rate does not fit in a `u32`.
    RateOutOfRange(i64),
    /// Gravity magnitude must be positive and finite.
    InvalidGravity(f32),
    /// Drag coefficient must be non-negative and finite.
    InvalidDrag(f32),
    /// Maximum particle age must be positive and finite.
    InvalidMaxAge(f32),
    /// Time step must be positive and finite.
    InvalidTimeStep(f32),
    /// Wind acceleration must be finite.
    InvalidWind(Vec3),
    /// Emitter origin must be finite.
    InvalidOrigin(Vec3),
    /// A label did not name any known variant.
    UnknownLabel {
        /// What the label was supposed to name ("weather kind", ...).
        what: &'static str,
        /// The label as given.
        label: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ShapeNotAllowed { kind, shape } => write!(
                f,
                "Emitter shape {} is not available for {} (allowed: {})",
                shape,
                kind,
                join_labels(kind.allowed_shapes())
            ),
            ValidationError::StyleNotAllowed { kind, style } => write!(
                f,
                "Render style {} is not available for {} (allowed: {})",
                style,
                kind,
                join_labels(kind.allowed_styles())
            ),
            ValidationError::NonPositiveRate(rate) => {
                write!(f, "Emission rate must be positive, got {}", rate)
            }
            ValidationError::RateOutOfRange(rate) => {
                write!(f, "Emission rate {} is too large", rate)
            }
            ValidationError::InvalidGravity(g) => {
                write!(f, "Gravity magnitude must be positive and finite, got {}", g)
            }
            ValidationError::InvalidDrag(d) => {
                write!(f, "Drag must be non-negative and finite, got {}", d)
            }
            ValidationError::InvalidMaxAge(age) => {
                write!(f, "Maximum particle age must be positive and finite, got {}", age)
            }
            ValidationError::InvalidTimeStep(dt) => {
                write!(f, "Time step must be positive and finite, got {}", dt)
            }
            ValidationError::InvalidWind(wind) => {
                write!(f, "Wind must be finite, got {}", wind)
            }
            ValidationError::InvalidOrigin(origin) => {
                write!(f, "Emitter origin must be finite, got {}", origin)
            }
            ValidationError::UnknownLabel { what, label } => {
                write!(f, "Unknown {} '{}'", what, label)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn join_labels<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Faults detected inside a single step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepError {
    /// The step was given a zero, negative or non-finite `dt`.
    InvalidTimeStep(f32),
    /// A particle ended the integration with a non-finite position or velocity.
    NonFiniteParticle {
        /// Index of the particle in the store at the time of the check.
        index: usize,
    },
    /// The step would emit more particles than a single step may spawn.
    TooManySpawns {
        /// Particles due this step.
        requested: usize,
        /// Per-step maximum.
        limit: usize,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::InvalidTimeStep(dt) => write!(f, "Invalid time step {}", dt),
            StepError::NonFiniteParticle { index } => {
                write!(f, "Particle {} has a non-finite position or velocity", index)
            }
            StepError::TooManySpawns { requested, limit } => write!(
                f,
                "Step would emit {} particles, more than the limit of {}",
                requested, limit
            ),
        }
    }
}

impl std::error::Error for StepError {}

/// Errors that can occur when driving a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration was rejected before the run began.
    Validation(ValidationError),
    /// `step` was called before `start`.
    NotStarted,
    /// `start` was called on a simulation that is not idle.
    AlreadyStarted,
    /// A step failed; the simulation has been stopped.
    Step {
        /// Index of the failed step (1-based, as in [`StepRecord`](crate::StepRecord)).
        step: u64,
        /// What went wrong.
        source: StepError,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Validation(e) => write!(f, "Invalid configuration: {}", e),
            SimulationError::NotStarted => {
                write!(f, "Simulation has not been started. Call .start() first.")
            }
            SimulationError::AlreadyStarted => {
                write!(f, "Simulation is not idle. Call .reset() before starting again.")
            }
            SimulationError::Step { step, source } => {
                write!(f, "Step {} failed: {}", step, source)
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Validation(e) => Some(e),
            SimulationError::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for SimulationError {
    fn from(e: ValidationError) -> Self {
        SimulationError::Validation(e)
    }
}

/// Errors from loading or saving a scenario file.
#[derive(Debug)]
pub enum ScenarioError {
    /// Failed to read or write a file.
    Io(std::io::Error),
    /// Failed to parse or produce JSON.
    Json(serde_json::Error),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "Failed to access scenario data: {}", e),
            ScenarioError::Json(e) => write!(f, "Malformed scenario JSON: {}", e),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(e) => Some(e),
            ScenarioError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        ScenarioError::Json(e)
    }
}

/// Errors from [`run_with`](crate::run_with): either the simulation failed
/// or the record sink could not be written.
#[derive(Debug)]
pub enum RunError {
    /// The simulation failed.
    Simulation(SimulationError),
    /// Writing a step record failed.
    Sink(std::io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Simulation(e) => write!(f, "{}", e),
            RunError::Sink(e) => write!(f, "Failed to write step record: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Simulation(e) => Some(e),
            RunError::Sink(e) => Some(e),
        }
    }
}

impl From<SimulationError> for RunError {
    fn from(e: SimulationError) -> Self {
        RunError::Simulation(e)
    }
}

impl From<ValidationError> for RunError {
    fn from(e: ValidationError) -> Self {
        RunError::Simulation(SimulationError::Validation(e))
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Sink(e)
    }
}
