//! Benchmarks for the CPU stepping pipeline.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weather_sim::config::RATE_PRESETS;
use weather_sim::prelude::*;

const DT: f32 = 1.0 / 24.0;

fn bench_force_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_apply");

    for count in [1_000usize, 10_000, 100_000] {
        let particles: Vec<Particle> = (0..count)
            .map(|i| {
                Particle::new(Vec3::new(i as f32 * 0.01, 20.0, 0.0), Vec3::new(0.0, -3.0, 0.0))
            })
            .collect();
        let forces = ForceField {
            gravity: 9.0,
            drag: 0.6,
            wind: Vec3::new(0.3, 0.0, 0.1),
        };

        let id = BenchmarkId::new("gravity_drag_wind", count);
        group.bench_with_input(id, &particles, |b, particles| {
            let mut particles = particles.clone();
            b.iter(|| forces.apply(black_box(&mut particles), DT))
        });
    }

    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");

    for shape in [EmitterShape::Omni, EmitterShape::Distributed, EmitterShape::Volume] {
        let config = validate(WeatherKind::Rain, 200, shape, RenderStyle::Points).unwrap();
        group.bench_function(shape.to_string(), |b| {
            let mut emitter = Emitter::new(&config);
            b.iter(|| black_box(emitter.emit(DT)))
        });
    }

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");

    for rate in RATE_PRESETS {
        let options = RunOptions::preset(WeatherKind::Rain, i64::from(rate));
        group.bench_with_input(BenchmarkId::new("rain_50_steps", rate), &options, |b, options| {
            b.iter(|| black_box(run(options).unwrap()))
        });
    }

    let mut heavy = RunOptions::preset(WeatherKind::Snow, 5_000);
    heavy.record_positions = false;
    group.bench_function("snow_5000_no_positions", |b| b.iter(|| black_box(run(&heavy).unwrap())));

    group.finish();
}

criterion_group!(benches, bench_force_apply, bench_emit, bench_full_run);
criterion_main!(benches);
