use std::ops::ControlFlow;

use grid_search::cell;
use grid_search::problem::{Algorithm, SearchProblem};
use grid_search::search_grid::SearchGrid;
use grid_search::step::Snapshot;

// In this example a breadth-first search runs on a 10x10 grid, printing every step:
// ..........
// ..#.......
// ........#.
// .#....#...
// ........#.
// ..#....#..
// ....#.....
// ..........
// ....#.....
// ..........
// from the top-left corner to the bottom-right one.
fn main() {
    let grid = SearchGrid::from_matrix(&[
        [0u8, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        [0, 1, 0, 0, 0, 0, 1, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        [0, 0, 1, 0, 0, 0, 0, 1, 0, 0],
        [0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ])
    .unwrap();
    let problem = SearchProblem::new(&grid, cell(0, 0), cell(9, 9), Algorithm::Bfs).unwrap();
    let mut step = 0;
    let outcome = problem.solve(&mut |snapshot: Snapshot| {
        step += 1;
        println!(
            "{:>3}: {} [{} pending, {} explored]",
            step,
            snapshot.status,
            snapshot.forward.frontier.len(),
            snapshot.forward.explored.len()
        );
        ControlFlow::Continue(())
    });
    if let Some(path) = outcome.into_path() {
        println!("A path has been found:");
        for p in path {
            println!("({}, {})", p.y, p.x);
        }
    }
}
