//! One-shot runs: options in, step records out.
//!
//! [`run`] validates a set of [`RunOptions`], steps a fresh
//! [`Simulation`] `total_steps` times and collects every [`StepRecord`].
//! [`run_with`] does the same but hands each record to a [`RecordSink`]
//! as soon as it is produced, so long runs need not sit in memory.
//!
//! Options serialize to JSON, which is the scenario file format:
//!
//! ```json
//! {
//!   "weather": "snow",
//!   "rate": 200,
//!   "style": "cloud",
//!   "total_steps": 50,
//!   "dt": 0.041666668
//! }
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionPlane, CollisionResponse};
use crate::config::{
    validate, Config, EmitterShape, WeatherKind, FRAME_RATE, TIMELINE_FRAMES,
};
use crate::error::{RunError, ScenarioError, SimulationError, ValidationError};
use crate::simulation::{Simulation, StepRecord};
use crate::visuals::{RenderHints, RenderStyle};

fn default_total_steps() -> u64 {
    u64::from(TIMELINE_FRAMES)
}

fn default_dt() -> f32 {
    1.0 / FRAME_RATE
}

fn default_true() -> bool {
    true
}

/// Everything needed for one run. Unset optional fields fall back to the
/// weather kind's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Rain or snow.
    pub weather: WeatherKind,
    /// Particles per second.
    pub rate: i64,
    /// Emitter shape; the kind's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<EmitterShape>,
    /// Render style; the kind's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<RenderStyle>,
    /// Gravity magnitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f32>,
    /// Linear drag coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag: Option<f32>,
    /// Constant wind acceleration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Vec3>,
    /// Emitter position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Vec3>,
    /// Seconds before a particle expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<f32>,
    /// Random seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// What happens when a particle reaches the ground.
    #[serde(default)]
    pub collision: CollisionResponse,
    /// Number of steps to run.
    #[serde(default = "default_total_steps")]
    pub total_steps: u64,
    /// Length of each step in seconds.
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Whether records carry particle positions.
    #[serde(default = "default_true")]
    pub record_positions: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::preset(WeatherKind::Rain, 100)
    }
}

impl RunOptions {
    /// Options for the given selection, gravity, step count and step length.
    pub fn new(
        weather: WeatherKind,
        rate: i64,
        shape: EmitterShape,
        style: RenderStyle,
        gravity: f32,
        total_steps: u64,
        dt: f32,
    ) -> Self {
        Self {
            shape: Some(shape),
            style: Some(style),
            gravity: Some(gravity),
            total_steps,
            dt,
            ..Self::preset(weather, rate)
        }
    }

    /// Options using every default for the weather kind: 50 steps at 24 fps.
    pub fn preset(weather: WeatherKind, rate: i64) -> Self {
        Self {
            weather,
            rate,
            shape: None,
            style: None,
            gravity: None,
            drag: None,
            wind: None,
            origin: None,
            max_age: None,
            seed: None,
            collision: CollisionResponse::default(),
            total_steps: default_total_steps(),
            dt: default_dt(),
            record_positions: true,
        }
    }

    /// Read options from a JSON scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let json = fs::read_to_string(path)?;
        let options = serde_json::from_str(&json)?;
        Ok(options)
    }

    /// Write options to a JSON scenario file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Validate into a [`Config`].
    pub fn to_config(&self) -> Result<Config, ValidationError> {
        let kind = self.weather;
        let mut config = validate(
            kind,
            self.rate,
            self.shape.unwrap_or_else(|| kind.default_shape()),
            self.style.unwrap_or_else(|| kind.default_style()),
        )?;

        if let Some(gravity) = self.gravity {
            config = config.with_gravity(gravity)?;
        }
        if let Some(drag) = self.drag {
            config = config.with_drag(drag)?;
        }
        if let Some(wind) = self.wind {
            config = config.with_wind(wind)?;
        }
        if let Some(origin) = self.origin {
            config = config.with_origin(origin)?;
        }
        if let Some(max_age) = self.max_age {
            config = config.with_max_age(max_age)?;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ValidationError::InvalidTimeStep(self.dt));
        }
        Ok(config)
    }

    /// Validate and build a ready-to-start simulation.
    pub fn build(&self) -> Result<Simulation, ValidationError> {
        let config = self.to_config()?;
        let ground = CollisionPlane::ground().with_response(self.collision);
        let limit = self.total_steps as f64 * f64::from(self.dt);
        Ok(Simulation::new(config)
            .with_ground(ground)
            .with_time_limit(Some(limit))
            .with_positions(self.record_positions))
    }
}

/// Totals for a finished run, plus how its particles should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Weather kind that was simulated.
    pub weather: WeatherKind,
    /// Render style selected for the particles.
    pub style: RenderStyle,
    /// Size hints for that style.
    pub hints: RenderHints,
    /// Live particles after the last step.
    pub final_count: usize,
    /// Steps actually taken.
    pub steps_run: u64,
    /// Simulated seconds.
    pub elapsed: f64,
    /// Particles emitted over the run.
    pub total_spawned: usize,
    /// Particles that hit the ground over the run.
    pub total_collided: usize,
    /// Particles that expired over the run.
    pub total_expired: usize,
}

impl RunSummary {
    fn new(config: &Config) -> Self {
        Self {
            weather: config.kind(),
            style: config.style(),
            hints: config.render_hints(),
            final_count: 0,
            steps_run: 0,
            elapsed: 0.0,
            total_spawned: 0,
            total_collided: 0,
            total_expired: 0,
        }
    }

    fn absorb(&mut self, record: &StepRecord) {
        self.final_count = record.particle_count;
        self.steps_run = record.step_index;
        self.elapsed = record.time;
        self.total_spawned += record.spawned;
        self.total_collided += record.collided;
        self.total_expired += record.expired;
    }
}

/// Summary plus every step record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run totals.
    pub summary: RunSummary,
    /// One record per step, in order.
    pub records: Vec<StepRecord>,
}

impl RunReport {
    /// Live particles after the last step.
    pub fn final_count(&self) -> usize {
        self.summary.final_count
    }

    /// Size hints for the run's render style.
    pub fn hints(&self) -> RenderHints {
        self.summary.hints
    }
}

/// Destination for step records.
pub trait RecordSink {
    /// Accept one record.
    fn record(&mut self, record: &StepRecord) -> io::Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<StepRecord> {
    fn record(&mut self, record: &StepRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes one JSON object per record, one per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn record(&mut self, record: &StepRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Writes records as packed binary frames in native byte order:
/// `u32` step index, `u32` position count, then `count * 3` `f32`s.
pub struct BinarySink<W: Write> {
    writer: W,
}

impl<W: Write> BinarySink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for BinarySink<W> {
    fn record(&mut self, record: &StepRecord) -> io::Result<()> {
        let step = u32::try_from(record.step_index).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "step index exceeds u32")
        })?;
        let count = u32::try_from(record.positions.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "position count exceeds u32")
        })?;
        let header = [step, count];
        self.writer.write_all(bytemuck::cast_slice(&header))?;
        self.writer.write_all(bytemuck::cast_slice(&record.positions))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Run a simulation to completion and collect every step record.
pub fn run(options: &RunOptions) -> Result<RunReport, SimulationError> {
    let mut records = Vec::new();
    let summary = drive(options, |record| {
        records.push(record);
        Ok::<_, SimulationError>(())
    })?;
    Ok(RunReport { summary, records })
}

/// Run a simulation to completion, streaming each record into `sink`.
pub fn run_with<S: RecordSink + ?Sized>(
    options: &RunOptions,
    sink: &mut S,
) -> Result<RunSummary, RunError> {
    let summary = drive(options, |record| sink.record(&record).map_err(RunError::from))?;
    sink.finish()?;
    Ok(summary)
}

fn drive<E>(
    options: &RunOptions,
    mut on_record: impl FnMut(StepRecord) -> Result<(), E>,
) -> Result<RunSummary, E>
where
    E: From<SimulationError>,
{
    let mut sim = options.build().map_err(SimulationError::from)?;
    sim.start()?;

    let mut summary = RunSummary::new(sim.config());
    for _ in 0..options.total_steps {
        let Some(record) = sim.step(options.dt)?.into_record() else {
            break;
        };
        summary.absorb(&record);
        on_record(record)?;
    }

    tracing::info!(
        style = %summary.style,
        steps = summary.steps_run,
        final_count = summary.final_count,
        spawned = summary.total_spawned,
        collided = summary.total_collided,
        expired = summary.total_expired,
        "run complete"
    );
    Ok(summary)
}
