use std::collections::VecDeque;

use fxhash::FxHashSet;
use grid_util::point::Point;
use log::{debug, info, trace};

use crate::fmt_cell;
use crate::reconstruct::{stitch, ParentMap};
use crate::search_grid::SearchGrid;
use crate::solver::{cancelled, finish_found, finish_no_path, search_sets, GridSolver};
use crate::step::{emit_with, CellSet, SearchOutcome, SearchSets, Side, Snapshot, Status, StepSink};

struct QueueEntry {
    cell: Point,
    parent: Option<Point>,
    depth: usize,
    cost: i64,
}

/// One of the two breadth-first searches. A cell's parent is recorded when the cell is
/// finalized, so `parents` only ever holds explored cells.
struct SearchTree {
    side: Side,
    queue: VecDeque<QueueEntry>,
    queued: FxHashSet<Point>,
    parents: ParentMap,
    explored: CellSet,
}

/// The cell a single expansion step finalized.
struct Expanded {
    cell: Point,
    depth: usize,
    cost: i64,
}

impl SearchTree {
    fn new(side: Side, root: Point) -> SearchTree {
        let mut queue = VecDeque::new();
        queue.push_back(QueueEntry {
            cell: root,
            parent: None,
            depth: 0,
            cost: 0,
        });
        let mut queued = FxHashSet::default();
        queued.insert(root);
        SearchTree {
            side,
            queue,
            queued,
            parents: ParentMap::with_root(root),
            explored: CellSet::default(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pops and finalizes one cell, queueing its unseen neighbours. Returns [None] once the
    /// queue holds nothing left to finalize.
    fn expand(&mut self, grid: &SearchGrid) -> Option<Expanded> {
        while let Some(entry) = self.queue.pop_front() {
            self.queued.remove(&entry.cell);
            if !self.explored.insert(entry.cell) {
                continue;
            }
            if let Some(parent) = entry.parent {
                self.parents.discover(entry.cell, &parent);
            }
            for (n, c) in grid.neighborhood_points_and_cost(&entry.cell) {
                if !self.explored.contains(&n) && self.queued.insert(n) {
                    self.queue.push_back(QueueEntry {
                        cell: n,
                        parent: Some(entry.cell),
                        depth: entry.depth + 1,
                        cost: entry.cost + c,
                    });
                }
            }
            return Some(Expanded {
                cell: entry.cell,
                depth: entry.depth,
                cost: entry.cost,
            });
        }
        None
    }

    fn sets(&self) -> SearchSets {
        search_sets(self.queue.iter().map(|e| &e.cell), &self.explored)
    }
}

/// Bidirectional breadth-first search. A forward search from the start and a backward search
/// from the target take turns finalizing one cell each. As soon as a side finalizes a cell that
/// the other side has already finalized, that cell is the meeting node and the two parent chains
/// are joined through it.
///
/// Only finalized cells are compared, not the opposite frontier, so the meeting can be detected
/// a little later than strictly necessary and the joined path is not guaranteed to be shortest.
#[derive(Clone, Copy, Debug, Default)]
pub struct BidirectionalSolver;

impl GridSolver for BidirectionalSolver {
    fn name(&self) -> &'static str {
        "Bidirectional"
    }

    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome {
        info!(
            "Bidirectional BFS from {} to {}",
            fmt_cell(&start),
            fmt_cell(&target)
        );
        let mut forward = SearchTree::new(Side::Forward, start);
        let mut backward = SearchTree::new(Side::Backward, target);
        let snapshot = |forward: &SearchTree, backward: &SearchTree, status: Status| {
            Snapshot::new(forward.sets(), status).with_backward(backward.sets())
        };

        while !(forward.is_exhausted() && backward.is_exhausted()) {
            for side in [Side::Forward, Side::Backward] {
                let (this, other) = match side {
                    Side::Forward => (&mut forward, &backward),
                    Side::Backward => (&mut backward, &forward),
                };
                let Some(expanded) = this.expand(grid) else {
                    continue;
                };
                let meets = other.parents.contains(&expanded.cell);
                trace!(
                    "Bidirectional {:?} exploring {}",
                    this.side,
                    fmt_cell(&expanded.cell)
                );
                let status = Status::Exploring {
                    cell: expanded.cell,
                    side,
                    depth: expanded.depth,
                    cost: expanded.cost,
                };
                if emit_with(sink, || snapshot(&forward, &backward, status)).is_break() {
                    return cancelled(self.name());
                }
                if meets {
                    debug!("Searches meet at {}", fmt_cell(&expanded.cell));
                    let path = stitch(&forward.parents, &backward.parents, &expanded.cell);
                    return finish_found(self, sink, path, |status| {
                        snapshot(&forward, &backward, status)
                    });
                }
            }
        }
        finish_no_path(sink, |status| snapshot(&forward, &backward, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::step::{NoopSink, RecordingSink};
    use grid_util::grid::ValueGrid;

    #[test]
    fn sides_alternate() {
        let grid = SearchGrid::new(5, 1, false);
        let mut sink = RecordingSink::new();
        let outcome = BidirectionalSolver.solve(&grid, cell(0, 0), cell(0, 4), &mut sink);
        assert_eq!(
            sink.statuses(),
            [
                "exploring (0, 0)",
                "exploring (0, 4) (backward)",
                "exploring (0, 1)",
                "exploring (0, 3) (backward)",
                "exploring (0, 2)",
                "exploring (0, 2) (backward)",
                "path found, cost = 4.00",
            ]
        );
        assert_eq!(
            outcome.path().unwrap(),
            &[cell(0, 0), cell(0, 1), cell(0, 2), cell(0, 3), cell(0, 4)]
        );
    }

    #[test]
    fn path_passes_through_meeting_node() {
        let grid: SearchGrid = "
            .....
            .###.
            .#...
            .#.#.
            ...#.
        "
        .parse()
        .unwrap();
        let mut sink = RecordingSink::new();
        let outcome = BidirectionalSolver.solve(&grid, cell(4, 2), cell(2, 2), &mut sink);
        let path = outcome.path().unwrap();
        assert_eq!(path.first(), Some(&cell(4, 2)));
        assert_eq!(path.last(), Some(&cell(2, 2)));
        assert!(grid.is_valid_path(path));
        let meeting = sink
            .snapshots
            .iter()
            .rev()
            .find_map(|s| match s.status {
                Status::Exploring { cell, .. } => Some(cell),
                _ => None,
            })
            .unwrap();
        assert!(path.contains(&meeting));
        let last = sink.last().unwrap();
        assert!(last.backward.is_some());
    }

    #[test]
    fn adjacent_endpoints() {
        let grid = SearchGrid::new(2, 1, false);
        let outcome = BidirectionalSolver.solve(&grid, cell(0, 0), cell(0, 1), &mut NoopSink);
        assert_eq!(outcome.path().unwrap(), &[cell(0, 0), cell(0, 1)]);
    }

    #[test]
    fn separated_regions() {
        let grid: SearchGrid = "...\n###\n...".parse().unwrap();
        let mut sink = RecordingSink::new();
        let outcome = BidirectionalSolver.solve(&grid, cell(0, 0), cell(2, 2), &mut sink);
        assert_eq!(outcome, SearchOutcome::NoPath);
        let last = sink.last().unwrap();
        assert_eq!(last.forward.explored.len(), 3);
        assert_eq!(last.backward.as_ref().unwrap().explored.len(), 3);
    }
}
