use std::collections::VecDeque;

use grid_util::point::Point;
use log::{info, trace};

use crate::fmt_cell;
use crate::reconstruct::ParentMap;
use crate::search_grid::SearchGrid;
use crate::solver::{cancelled, finish_found, finish_no_path, search_sets, GridSolver};
use crate::step::{emit_with, CellSet, SearchOutcome, Side, Snapshot, Status, StepSink};

/// Breadth-first search. Cells leave the FIFO queue in non-decreasing step count, so the first
/// time the target is popped its path has the fewest possible cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl GridSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome {
        info!("BFS from {} to {}", fmt_cell(&start), fmt_cell(&target));
        // (cell, depth, cost)
        let mut queue: VecDeque<(Point, usize, i64)> = VecDeque::new();
        queue.push_back((start, 0, 0));
        let mut parents = ParentMap::with_root(start);
        let mut explored = CellSet::default();

        while let Some((current, depth, cost)) = queue.pop_front() {
            if !explored.insert(current) {
                continue;
            }
            trace!("BFS exploring {} at depth {}", fmt_cell(&current), depth);
            let snapshot = |status: Status| {
                Snapshot::new(search_sets(queue.iter().map(|(p, _, _)| p), &explored), status)
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
                // Parents hold every cell that is queued or explored.
                if !explored.contains(&n) && parents.discover(n, &current) {
                    queue.push_back((n, depth + 1, cost + c));
                }
            }
        }
        finish_no_path(sink, |status: Status| {
            Snapshot::new(search_sets(queue.iter().map(|(p, _, _)| p), &explored), status)
        })
    }
}
