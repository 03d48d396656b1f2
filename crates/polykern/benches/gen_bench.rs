//! Criterion microbenches for the seeded samplers and hot-path primitives.
//!
//! - Sampling: radial polygons, uniform points in a rectangle.
//! - Primitives: self-intersection scan, convex hull, rectangle clipping.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use polykern::api::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let cfg = RadialCfg {
        vertex_count: VertexCount::Uniform { min: 6, max: 12 },
        angle_jitter_frac: 0.25,
        radial_jitter: 0.2,
        base_radius: 1.0,
        random_phase: true,
    };
    group.bench_function(BenchmarkId::new("draw_polygon_radial", "6-12"), |b| {
        b.iter_batched(
            || ReplayToken { seed: 42, index: 0 },
            |mut tok| {
                tok.index = tok.index.wrapping_add(1);
                draw_polygon_radial(cfg, tok)
            },
            BatchSize::SmallInput,
        )
    });
    for &count in &[100usize, 1000] {
        group.bench_with_input(
            BenchmarkId::new("sample_points_in_rect", count),
            &count,
            |b, &count| {
                let rect = Rect::from_size(50.0, 20.0);
                b.iter(|| sample_points_in_rect(count, rect, ReplayToken::new(3)))
            },
        );
    }
    group.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    for &n in &[16usize, 64, 256] {
        let ring = draw_polygon_radial(
            RadialCfg {
                vertex_count: VertexCount::Fixed(n),
                ..RadialCfg::default()
            },
            ReplayToken { seed: 5, index: n as u64 },
        );
        group.bench_with_input(BenchmarkId::new("first_self_intersection", n), &ring, |b, ring| {
            b.iter(|| first_self_intersection(ring, 1e-12))
        });
        group.bench_with_input(BenchmarkId::new("convex_hull", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(n as u64);
                    (0..n)
                        .map(|_| Point::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
                        .collect::<Vec<_>>()
                },
                |pts| convex_hull(&pts),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("clip_to_rect", n), &ring, |b, ring| {
            let rect = Rect::new(Point::new(-0.5, -0.5), Point::new(0.5, 0.5));
            b.iter(|| clip_to_rect(ring, &rect))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_primitives);
criterion_main!(benches);
