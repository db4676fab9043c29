//! Generation benchmarks
//!
//! Covers the three generators at realistic sizes. Universe generation
//! dominates startup, so it gets the preset-sized case; galaxy and
//! system generation run on every drill-down and should stay well
//! under a frame.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use deepfield::core::config::{GenerationConfig, QualityPreset};
use deepfield::procgen::galaxy::{describe_galaxy, field_star_count, GalaxyField};
use deepfield::procgen::system::{describe_system, StarSystem};
use deepfield::procgen::universe::Starfield;

fn bench_universe_generation(c: &mut Criterion) {
    let config = GenerationConfig::preset(QualityPreset::Low, 1337);
    c.bench_function("universe_low_preset", |b| {
        b.iter(|| Starfield::generate(black_box(&config)))
    });
}

fn bench_galaxy_field(c: &mut Criterion) {
    let info = describe_galaxy(1337, 8.0);
    let count = field_star_count(QualityPreset::Low.star_count());
    c.bench_function("galaxy_field_low_preset", |b| {
        b.iter(|| GalaxyField::generate(black_box(1337), black_box(&info), black_box(count)))
    });
}

fn bench_system_generation(c: &mut Criterion) {
    c.bench_function("system_describe_and_generate", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let info = describe_system(black_box(seed), 8.0);
            StarSystem::generate(seed, &info)
        })
    });
}

criterion_group!(
    benches,
    bench_universe_generation,
    bench_galaxy_field,
    bench_system_generation
);
criterion_main!(benches);
