use criterion::{criterion_group, criterion_main, Criterion};
use grid_search::problem::{Algorithm, SearchProblem};
use grid_search::search_grid::SearchGrid;
use grid_search::step::NoopSink;
use grid_util::{grid::ValueGrid, point::Point};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

const N: usize = 32;
const N_GRIDS: usize = 16;

/// Random grids with the corners kept free, paired with the corners as start and target.
fn random_scenarios() -> Vec<(SearchGrid, Point, Point)> {
    let mut rng = StdRng::seed_from_u64(0);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    (0..N_GRIDS)
        .map(|_| {
            let mut grid = SearchGrid::new(N, N, false);
            for x in 0..N as i32 {
                for y in 0..N as i32 {
                    grid.set(x, y, rng.gen_bool(0.3));
                }
            }
            grid.set(start.x, start.y, false);
            grid.set(end.x, end.y, false);
            grid.generate_components();
            (grid, start, end)
        })
        .collect()
}

fn random_bench_solver(c: &mut Criterion, algorithm: Algorithm) {
    let scenarios = random_scenarios();
    c.bench_function(format!("random {N}x{N}, {algorithm}").as_str(), |b| {
        b.iter(|| {
            for (grid, start, end) in &scenarios {
                // Unreachable targets would make the uninformed searches sweep the whole region.
                if grid.unreachable(start, end) {
                    continue;
                }
                let problem = SearchProblem::new(grid, *start, *end, algorithm).unwrap();
                black_box(problem.solve(&mut NoopSink));
            }
        })
    });
}

fn open_bench_solver(c: &mut Criterion, algorithm: Algorithm) {
    let grid = SearchGrid::new(N, N, false);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 / 2);
    let problem = SearchProblem::new(&grid, start, end, algorithm).unwrap();
    c.bench_function(format!("open {N}x{N}, {algorithm}").as_str(), |b| {
        b.iter(|| black_box(problem.solve(&mut NoopSink)))
    });
}

fn comparison_bench(c: &mut Criterion) {
    for algorithm in Algorithm::all(N * N) {
        random_bench_solver(c, algorithm);
        open_bench_solver(c, algorithm);
    }
}

fn recording_bench(c: &mut Criterion) {
    let grid = SearchGrid::new(N, N, false);
    let problem = SearchProblem::new(
        &grid,
        Point::new(0, 0),
        Point::new(N as i32 - 1, N as i32 - 1),
        Algorithm::Bfs,
    )
    .unwrap();
    c.bench_function(format!("open {N}x{N}, BFS with snapshots").as_str(), |b| {
        b.iter(|| black_box(problem.trace()))
    });
}

criterion_group!(benches, comparison_bench, recording_bench);
criterion_main!(benches);
