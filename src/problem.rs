use crate::fmt_cell;
use crate::search_grid::SearchGrid;
use crate::solver::{
    bfs::BfsSolver, bidirectional::BidirectionalSolver, dfs::DfsSolver, dls::DlsSolver,
    iddfs::IddfsSolver, ucs::UcsSolver, GridSolver,
};
use crate::step::{RecordingSink, SearchOutcome, Snapshot, StepSink};
use core::fmt;
use grid_util::point::Point;
use thiserror::Error;

/// Which end of the search a coordinate belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}

/// Reasons a problem is rejected before any search starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("{endpoint} cell {cell} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        endpoint: Endpoint,
        cell: String,
        rows: usize,
        cols: usize,
    },
    #[error("{endpoint} cell {cell} is a wall")]
    Wall { endpoint: Endpoint, cell: String },
    #[error("start and target are the same cell {0}")]
    SameStartTarget(String),
    #[error("depth limit {0:?} is not a non-negative integer")]
    InvalidDepthLimit(String),
    #[error("depth-limited search needs a depth limit")]
    MissingDepthLimit,
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),
}

/// The search strategy, selected once per problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dls { limit: usize },
    Iddfs,
    Ucs,
    Bidirectional,
}

impl Algorithm {
    /// Every algorithm, with depth-limited search using `dls_limit`.
    pub fn all(dls_limit: usize) -> [Algorithm; 6] {
        [
            Algorithm::Bfs,
            Algorithm::Dfs,
            Algorithm::Dls { limit: dls_limit },
            Algorithm::Iddfs,
            Algorithm::Ucs,
            Algorithm::Bidirectional,
        ]
    }

    /// Parses an algorithm name as typed by a user. The depth limit is required for, and only
    /// read by, depth-limited search.
    pub fn parse(name: &str, depth_limit: Option<&str>) -> Result<Algorithm, ProblemError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "dls" => {
                let limit = depth_limit.ok_or(ProblemError::MissingDepthLimit)?;
                Ok(Algorithm::Dls {
                    limit: parse_depth_limit(limit)?,
                })
            }
            "iddfs" => Ok(Algorithm::Iddfs),
            "ucs" => Ok(Algorithm::Ucs),
            "bidirectional" | "bibfs" => Ok(Algorithm::Bidirectional),
            _ => Err(ProblemError::UnknownAlgorithm(name.to_owned())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Bfs => write!(f, "BFS"),
            Algorithm::Dfs => write!(f, "DFS"),
            Algorithm::Dls { limit } => write!(f, "DLS(limit={})", limit),
            Algorithm::Iddfs => write!(f, "IDDFS"),
            Algorithm::Ucs => write!(f, "UCS"),
            Algorithm::Bidirectional => write!(f, "Bidirectional"),
        }
    }
}

/// Parses a depth limit, rejecting anything but a non-negative integer.
pub fn parse_depth_limit(text: &str) -> Result<usize, ProblemError> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| ProblemError::InvalidDepthLimit(text.to_owned()))
}

/// A validated search problem. The grid is borrowed immutably for as long as the problem lives,
/// so it cannot change during a run.
#[derive(Clone, Copy, Debug)]
pub struct SearchProblem<'a> {
    grid: &'a SearchGrid,
    start: Point,
    target: Point,
    algorithm: Algorithm,
}

impl<'a> SearchProblem<'a> {
    pub fn new(
        grid: &'a SearchGrid,
        start: Point,
        target: Point,
        algorithm: Algorithm,
    ) -> Result<SearchProblem<'a>, ProblemError> {
        for (endpoint, p) in [(Endpoint::Start, start), (Endpoint::Target, target)] {
            if !grid.in_bounds(p.x, p.y) {
                return Err(ProblemError::OutOfBounds {
                    endpoint,
                    cell: fmt_cell(&p),
                    rows: grid.rows(),
                    cols: grid.cols(),
                });
            }
            if grid.is_wall(&p) {
                return Err(ProblemError::Wall {
                    endpoint,
                    cell: fmt_cell(&p),
                });
            }
        }
        if start == target {
            return Err(ProblemError::SameStartTarget(fmt_cell(&start)));
        }
        Ok(SearchProblem {
            grid,
            start,
            target,
            algorithm,
        })
    }

    pub fn grid(&self) -> &'a SearchGrid {
        self.grid
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn target(&self) -> Point {
        self.target
    }
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Runs the selected algorithm, reporting progress to `sink`.
    pub fn solve<S: StepSink + ?Sized>(&self, sink: &mut S) -> SearchOutcome {
        match self.algorithm {
            Algorithm::Bfs => self.run(&BfsSolver, sink),
            Algorithm::Dfs => self.run(&DfsSolver, sink),
            Algorithm::Dls { limit } => self.run(&DlsSolver::new(limit), sink),
            Algorithm::Iddfs => self.run(&IddfsSolver::new(), sink),
            Algorithm::Ucs => self.run(&UcsSolver, sink),
            Algorithm::Bidirectional => self.run(&BidirectionalSolver, sink),
        }
    }

    /// Runs the selected algorithm and returns the outcome together with every snapshot it
    /// produced, in order.
    pub fn trace(&self) -> (SearchOutcome, Vec<Snapshot>) {
        let mut sink = RecordingSink::new();
        let outcome = self.solve(&mut sink);
        (outcome, sink.snapshots)
    }

    fn run<G: GridSolver, S: StepSink + ?Sized>(&self, solver: &G, sink: &mut S) -> SearchOutcome {
        solver.solve(self.grid, self.start, self.target, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;

    fn grid() -> SearchGrid {
        "...\n.#.\n...".parse().unwrap()
    }

    #[test]
    fn rejects_out_of_bounds() {
        let grid = grid();
        let err = SearchProblem::new(&grid, cell(0, 0), cell(3, 0), Algorithm::Bfs).unwrap_err();
        assert_eq!(
            err,
            ProblemError::OutOfBounds {
                endpoint: Endpoint::Target,
                cell: "(3, 0)".to_owned(),
                rows: 3,
                cols: 3
            }
        );
        assert!(SearchProblem::new(&grid, cell(-1, 0), cell(2, 2), Algorithm::Bfs).is_err());
    }

    #[test]
    fn rejects_walls_and_equal_endpoints() {
        let grid = grid();
        let err = SearchProblem::new(&grid, cell(1, 1), cell(2, 2), Algorithm::Ucs).unwrap_err();
        assert_eq!(err.to_string(), "start cell (1, 1) is a wall");
        let err = SearchProblem::new(&grid, cell(2, 2), cell(2, 2), Algorithm::Ucs).unwrap_err();
        assert_eq!(err, ProblemError::SameStartTarget("(2, 2)".to_owned()));
    }

    #[test]
    fn accepts_valid_problem() {
        let grid = grid();
        let problem = SearchProblem::new(&grid, cell(0, 0), cell(2, 2), Algorithm::Iddfs).unwrap();
        assert_eq!(problem.start(), cell(0, 0));
        assert_eq!(problem.target(), cell(2, 2));
        assert_eq!(problem.algorithm(), Algorithm::Iddfs);
        assert!(std::ptr::eq(problem.grid(), &grid));
    }

    #[test]
    fn parses_algorithms() {
        assert_eq!(Algorithm::parse("BFS", None), Ok(Algorithm::Bfs));
        assert_eq!(Algorithm::parse(" ucs ", None), Ok(Algorithm::Ucs));
        assert_eq!(
            Algorithm::parse("Bidirectional", None),
            Ok(Algorithm::Bidirectional)
        );
        assert_eq!(
            Algorithm::parse("DLS", Some("4")),
            Ok(Algorithm::Dls { limit: 4 })
        );
        assert_eq!(
            Algorithm::parse("DLS", None),
            Err(ProblemError::MissingDepthLimit)
        );
        assert_eq!(
            Algorithm::parse("astar", None),
            Err(ProblemError::UnknownAlgorithm("astar".to_owned()))
        );
    }

    #[test]
    fn depth_limit_must_be_non_negative_integer() {
        assert_eq!(parse_depth_limit("0"), Ok(0));
        assert_eq!(parse_depth_limit(" 12 "), Ok(12));
        for bad in ["-1", "2.5", "", "ten"] {
            assert_eq!(
                parse_depth_limit(bad),
                Err(ProblemError::InvalidDepthLimit(bad.to_owned()))
            );
        }
    }
}
