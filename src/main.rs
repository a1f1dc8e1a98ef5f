//! Just `main()` and the glue between CLI flags and a run.

mod cli_args;

use std::fs::File;
use std::io::BufWriter;

use clap::Parser as _;
use color_eyre::eyre::{Result, WrapErr as _};
use weather_sim::{
    run_with, BinarySink, JsonLinesSink, RecordSink, RunOptions, RunSummary, WeatherKind,
};

use crate::cli_args::{CliArgs, OutputFormat};

const LOG_ENV: &str = "WEATHER_SIM_LOG";

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli_args = CliArgs::parse();
    setup_logging(&cli_args)?;

    let options = resolve_options(&cli_args)?;
    if let Some(path) = &cli_args.save_scenario {
        options
            .save(path)
            .wrap_err_with(|| format!("saving scenario to {}", path.display()))?;
    }

    let summary = match &cli_args.output {
        Some(path) => {
            let file = File::create(path).wrap_err_with(|| format!("creating {}", path.display()))?;
            let writer = BufWriter::new(file);
            match cli_args.format {
                OutputFormat::Json => run_with(&options, &mut JsonLinesSink::new(writer))?,
                OutputFormat::Binary => run_with(&options, &mut BinarySink::new(writer))?,
            }
        }
        None => run_with(&options, &mut Discard)?,
    };

    report(&options, &summary);
    Ok(())
}

/// Scenario file first, then any flags on top.
fn resolve_options(cli_args: &CliArgs) -> Result<RunOptions> {
    let mut options = match &cli_args.scenario {
        Some(path) => RunOptions::load(path)
            .wrap_err_with(|| format!("loading scenario {}", path.display()))?,
        None => RunOptions::preset(cli_args.weather.unwrap_or(WeatherKind::Rain), 100),
    };

    if let Some(weather) = cli_args.weather {
        options.weather = weather;
    }
    if let Some(rate) = cli_args.rate {
        options.rate = rate;
    }
    if cli_args.shape.is_some() {
        options.shape = cli_args.shape;
    }
    if cli_args.style.is_some() {
        options.style = cli_args.style;
    }
    if cli_args.gravity.is_some() {
        options.gravity = cli_args.gravity;
    }
    if cli_args.drag.is_some() {
        options.drag = cli_args.drag;
    }
    if cli_args.max_age.is_some() {
        options.max_age = cli_args.max_age;
    }
    if cli_args.seed.is_some() {
        options.seed = cli_args.seed;
    }
    if let Some(steps) = cli_args.steps {
        options.total_steps = steps;
    }
    if let Some(dt) = cli_args.dt {
        options.dt = dt;
    }
    // Positions are only worth collecting when someone reads them.
    options.record_positions = cli_args.output.is_some();

    Ok(options)
}

fn setup_logging(cli_args: &CliArgs) -> Result<()> {
    let filters = if std::env::var(LOG_ENV).is_ok() {
        tracing_subscriber::EnvFilter::builder()
            .with_env_var(LOG_ENV)
            .with_default_directive("warn".parse()?)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .parse_lossy("")
            .add_directive(format!("weather_sim={}", cli_args.log_level.to_lowercase()).parse()?)
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filters)
        .init();
    Ok(())
}

fn report(options: &RunOptions, summary: &RunSummary) {
    println!(
        "{} x{}: {} steps, {:.3}s simulated, {} spawned, {} hit the ground, {} expired, {} left",
        summary.weather,
        options.rate,
        summary.steps_run,
        summary.elapsed,
        summary.total_spawned,
        summary.total_collided,
        summary.total_expired,
        summary.final_count,
    );
    println!(
        "style {} (max radius {}, radius multiplier {})",
        summary.style, summary.hints.max_radius, summary.hints.radius_multiplier,
    );
}

/// Sink for runs that only want the summary.
struct Discard;

impl RecordSink for Discard {
    fn record(&mut self, _record: &weather_sim::StepRecord) -> std::io::Result<()> {
        Ok(())
    }
}
