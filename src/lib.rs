//! # grid_search
//!
//! Classical uninformed graph search on an occupancy grid, built to drive step-by-step
//! visualizations. Implements
//! [breadth-first](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [depth-first](https://en.wikipedia.org/wiki/Depth-first_search),
//! depth-limited,
//! [iterative deepening](https://en.wikipedia.org/wiki/Iterative_deepening_depth-first_search),
//! uniform-cost and bidirectional breadth-first search.
//!
//! Movement is restricted to six directions (up, right, down, down-right, left, up-left), where
//! the two diagonal moves cost 1.414 and the four straight moves cost 1.0. Every algorithm
//! reports its progress to a [StepSink](step::StepSink) after each cell it finalizes, and
//! ends with either a path or an explicit "no path" outcome.
//!
//! ```
//! use grid_search::problem::{Algorithm, SearchProblem};
//! use grid_search::search_grid::SearchGrid;
//! use grid_search::step::NoopSink;
//! use grid_search::cell;
//!
//! let grid: SearchGrid = "...\n...\n...".parse().unwrap();
//! let problem = SearchProblem::new(&grid, cell(0, 0), cell(2, 2), Algorithm::Bfs).unwrap();
//! let outcome = problem.solve(&mut NoopSink);
//! assert_eq!(outcome.path().unwrap().len(), 3);
//! ```
pub mod problem;
pub mod reconstruct;
pub mod search_grid;
pub mod solver;
pub mod step;

use grid_util::point::Point;

/// Cost of a straight (up, right, down, left) move.
pub const C: i64 = 1000;
/// Cost of a diagonal (down-right, up-left) move, 1.414 in unit terms.
pub const D: i64 = 1414;

/// Inline capacity for neighbourhoods, one slot per movement direction.
pub const N_SMALLVEC_SIZE: usize = 6;

/// Builds the cell at the given row and column. Cells are stored as [Point]s with `x` being the
/// column and `y` the row.
pub fn cell(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

/// Converts the integer cost to an approximate floating point equivalent where straight moves
/// have cost 1.0.
pub fn convert_cost_to_unit_cost_float(cost: i64) -> f64 {
    (cost as f64) / (C as f64)
}

/// Formats a cell as `(row, col)`.
pub(crate) fn fmt_cell(p: &Point) -> String {
    format!("({}, {})", p.y, p.x)
}
