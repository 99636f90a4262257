use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use farmlayout::constraints::{Boundary, BoundaryType, SpacingConstraint};
use farmlayout::geometry::primitives::Point;
use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

criterion_main!(benches);
criterion_group!(benches, spacing_bench, boundary_bench);

const N_TURBINES: [usize; 3] = [16, 64, 256];

/// Random layout in a 10km x 10km square
fn random_layout(n_wt: usize, rng: &mut impl Rng) -> (Vec<f64>, Vec<f64>) {
    let xs = (0..n_wt).map(|_| rng.random_range(0.0..10_000.0)).collect();
    let ys = (0..n_wt).map(|_| rng.random_range(0.0..10_000.0)).collect();
    (xs, ys)
}

/// Residuals and Jacobian of the spacing constraint, which grow quadratically with the number of turbines
fn spacing_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("spacing");
    let mut rng = SmallRng::seed_from_u64(0);
    for n_wt in N_TURBINES {
        let spacing = SpacingConstraint::new(n_wt, 400.0).unwrap();
        let (xs, ys) = random_layout(n_wt, &mut rng);
        group.bench_function(BenchmarkId::new("residuals", n_wt), |b| {
            b.iter(|| black_box(spacing.residuals(&xs, &ys)))
        });
        group.bench_function(BenchmarkId::new("jacobian", n_wt), |b| {
            b.iter(|| black_box(spacing.jacobian(&xs, &ys)))
        });
    }
    group.finish();
}

/// Boundary residuals against a convex and a concave boundary
fn boundary_bench(c: &mut Criterion) {
    //star shaped boundary with 32 vertices
    let star = (0..32)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::PI / 16.0;
            let r = if i % 2 == 0 { 5_000.0 } else { 3_000.0 };
            Point(5_000.0 + r * angle.cos(), 5_000.0 + r * angle.sin())
        })
        .collect::<Vec<_>>();

    let mut group = c.benchmark_group("boundary");
    let mut rng = SmallRng::seed_from_u64(0);
    for btype in [BoundaryType::ConvexHull, BoundaryType::Polygon] {
        let boundary = Boundary::new(&star, btype).unwrap();
        for n_wt in N_TURBINES {
            let (xs, ys) = random_layout(n_wt, &mut rng);
            group.bench_function(BenchmarkId::new(format!("{btype:?}"), n_wt), |b| {
                b.iter(|| black_box(boundary.distances(&xs, &ys)))
            });
        }
    }
    group.finish();
}
