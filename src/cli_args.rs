//! All the CLI arguments for weather-sim

use std::path::PathBuf;

use weather_sim::{EmitterShape, RenderStyle, WeatherKind};

/// Simulate rain or snow and report what every step did.
#[derive(clap::Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
#[non_exhaustive]
pub struct CliArgs {
    /// JSON scenario to start from. Other flags override its fields.
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Write the resolved scenario to this path before running.
    #[arg(long)]
    pub save_scenario: Option<PathBuf>,

    /// Weather kind: rain or snow.
    #[arg(short, long)]
    pub weather: Option<WeatherKind>,

    /// Particles emitted per second.
    #[arg(short, long, allow_negative_numbers = true)]
    pub rate: Option<i64>,

    /// Emitter shape: omni, distributed or volume. Defaults per weather kind.
    #[arg(long)]
    pub shape: Option<EmitterShape>,

    /// Render style, e.g. points, streak, cloud. Defaults per weather kind.
    #[arg(long)]
    pub style: Option<RenderStyle>,

    /// Gravity magnitude.
    #[arg(short, long)]
    pub gravity: Option<f32>,

    /// Linear drag coefficient.
    #[arg(long)]
    pub drag: Option<f32>,

    /// Seconds before a particle expires.
    #[arg(long)]
    pub max_age: Option<f32>,

    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of steps to run.
    #[arg(short = 'n', long)]
    pub steps: Option<u64>,

    /// Seconds per step.
    #[arg(long)]
    pub dt: Option<f32>,

    /// Write step records to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Format of the records written to `--output`.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log level. `WEATHER_SIM_LOG` overrides it with full filter directives.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Step record encodings.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON object per line.
    Json,
    /// Packed positions, see `BinarySink`.
    Binary,
}
