use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_flatten::algs::boundary::boundary_edges;
use mesh_flatten::algs::loops::edges_to_loops;
use mesh_flatten::geometry::best_fit_plane;
use mesh_flatten::mesh_generation::quad_grid;

fn noisy_points(n: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x: f64 = rng.gen_range(-10.0..10.0);
            let y: f64 = rng.gen_range(-10.0..10.0);
            [x, y, 0.3 * x - 0.2 * y + rng.gen_range(-0.01..0.01)]
        })
        .collect()
}

fn bench_best_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_fit_plane");
    for &n in &[16usize, 256, 4096] {
        let points = noisy_points(n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, pts| {
            b.iter(|| black_box(best_fit_plane(black_box(pts))));
        });
    }
    group.finish();
}

fn bench_loop_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_loops");
    for &side in &[8usize, 32, 64] {
        let grid = quad_grid(side, side, 1.0);
        group.bench_with_input(BenchmarkId::from_parameter(side), &grid, |b, grid| {
            b.iter(|| {
                let boundary = boundary_edges(&grid.mesh, &grid.faces).unwrap();
                black_box(edges_to_loops(&grid.mesh, &boundary))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_best_fit, bench_loop_walk);
criterion_main!(benches);
