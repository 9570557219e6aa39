use grid_util::point::Point;
use log::{info, trace};

use crate::fmt_cell;
use crate::reconstruct::ParentMap;
use crate::search_grid::SearchGrid;
use crate::solver::{cancelled, finish_found, finish_no_path, search_sets, GridSolver};
use crate::step::{emit_with, CellSet, SearchOutcome, Side, Snapshot, Status, StepSink};

/// Depth-first search with a LIFO stack: the most recently pushed neighbour, i.e. the last one
/// in movement order, is expanded next. Every cell is pushed at most once, so the search
/// terminates, but the path it returns is not shortest in any sense.
#[derive(Clone, Copy, Debug, Default)]
pub struct DfsSolver;

impl GridSolver for DfsSolver {
    fn name(&self) -> &'static str {
        "DFS"
    }

    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome {
        info!("DFS from {} to {}", fmt_cell(&start), fmt_cell(&target));
        let mut stack: Vec<(Point, usize, i64)> = vec![(start, 0, 0)];
        let mut parents = ParentMap::with_root(start);
        let mut explored = CellSet::default();

        while let Some((current, depth, cost)) = stack.pop() {
            if !explored.insert(current) {
                continue;
            }
            trace!("DFS exploring {} at depth {}", fmt_cell(&current), depth);
            let snapshot = |status: Status| {
                Snapshot::new(search_sets(stack.iter().map(|(p, _, _)| p), &explored), status)
            };
            let status = Status::Exploring {
                cell: current,
                side: Side::Forward,
                depth,
                cost,
            };
            if emit_with(sink, || snapshot(status)).is_break() {
                return cancelled(self.name());
            }
            if current == target {
                return finish_found(self, sink, parents.path_to(&target), snapshot);
            }
            for (n, c) in grid.neighborhood_points_and_cost(&current) {
                if !explored.contains(&n) && parents.discover(n, &current) {
                    stack.push((n, depth + 1, cost + c));
                }
            }
        }
        finish_no_path(sink, |status: Status| {
            Snapshot::new(search_sets(stack.iter().map(|(p, _, _)| p), &explored), status)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::step::{NoopSink, RecordingSink};
    use grid_util::grid::ValueGrid;

    /// The last neighbour in movement order (up-left) is expanded first, so DFS walks the
    /// diagonal back towards the start corner before anything else.
    #[test]
    fn expands_last_pushed_neighbour_first() {
        let grid = SearchGrid::new(3, 3, false);
        let mut sink = RecordingSink::new();
        let outcome = DfsSolver.solve(&grid, cell(2, 2), cell(0, 2), &mut sink);
        assert!(outcome.is_found());
        assert_eq!(sink.statuses()[..2], ["exploring (2, 2)", "exploring (1, 1)"]);
    }

    #[test]
    fn finds_some_valid_path() {
        let grid: SearchGrid = "
            S...#
            .##.#
            ...#.
            #...T
        "
        .parse()
        .unwrap();
        let outcome = DfsSolver.solve(&grid, cell(0, 0), cell(3, 4), &mut NoopSink);
        let path = outcome.path().unwrap();
        assert_eq!(path.first(), Some(&cell(0, 0)));
        assert_eq!(path.last(), Some(&cell(3, 4)));
        assert!(grid.is_valid_path(path));
    }

    #[test]
    fn visits_each_cell_once() {
        let grid = SearchGrid::new(4, 4, false);
        let mut sink = RecordingSink::new();
        DfsSolver.solve(&grid, cell(0, 0), cell(3, 3), &mut sink);
        let explored: Vec<_> = sink
            .snapshots
            .iter()
            .filter_map(|s| match s.status {
                Status::Exploring { cell, .. } => Some(cell),
                _ => None,
            })
            .collect();
        let unique: CellSet = explored.iter().copied().collect();
        assert_eq!(unique.len(), explored.len());
    }
}
