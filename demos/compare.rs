use grid_search::cell;
use grid_search::problem::{Algorithm, SearchProblem};
use grid_search::search_grid::SearchGrid;
use grid_search::step::RecordingSink;

// Runs every algorithm on the same maze and compares the paths they return and the number of
// steps they take to get there.
// S marks the start
// T marks the target
fn main() {
    let grid: SearchGrid = "
        S...#.....
        .##.#.###.
        .#..#...#.
        .#.###..#.
        .#......#.
        .####.###.
        ......#..T
    "
    .parse()
    .unwrap();
    println!("{grid}");
    let (start, target) = (cell(0, 0), cell(6, 9));
    for algorithm in Algorithm::all(24) {
        let problem = SearchProblem::new(&grid, start, target, algorithm).unwrap();
        let mut sink = RecordingSink::new();
        let outcome = problem.solve(&mut sink);
        match outcome.path() {
            Some(path) => println!(
                "{:>14}: {:>3} steps, path of {:>2} cells, cost {:.3}",
                algorithm.to_string(),
                sink.snapshots.len(),
                path.len(),
                outcome.cost_float().unwrap_or_default()
            ),
            None => println!(
                "{:>14}: {:>3} steps, no path",
                algorithm.to_string(),
                sink.snapshots.len()
            ),
        }
    }
}
