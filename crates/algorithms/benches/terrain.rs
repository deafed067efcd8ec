//! Benchmarks for terrain algorithms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geomatica_algorithms::synthetic::{synthetic_dem, SyntheticDemParams};
use geomatica_algorithms::terrain::{aspect, hillshade, slope, AspectOutput, HillshadeParams, SlopeParams};

fn bench_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain");

    for size in [100, 500, 1000] {
        let params = SyntheticDemParams {
            size,
            falloff: 150.0 / size as f64,
            ..Default::default()
        };
        let dem = synthetic_dem(&params).unwrap();

        group.bench_with_input(BenchmarkId::new("slope", size), &dem, |b, dem| {
            b.iter(|| slope(black_box(dem), SlopeParams::default()).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("aspect", size), &dem, |b, dem| {
            b.iter(|| aspect(black_box(dem), AspectOutput::Degrees).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("hillshade", size), &dem, |b, dem| {
            b.iter(|| hillshade(black_box(dem), HillshadeParams::default()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_terrain);
criterion_main!(benches);
