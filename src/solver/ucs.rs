use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fxhash::FxHashMap;
use grid_util::point::Point;
use log::{info, trace};

use crate::fmt_cell;
use crate::reconstruct::ParentMap;
use crate::search_grid::SearchGrid;
use crate::solver::{cancelled, finish_found, finish_no_path, search_sets, GridSolver};
use crate::step::{emit_with, CellSet, SearchOutcome, Side, Snapshot, Status, StepSink};

/// Heap entry. Ordered so that [BinaryHeap], a max-heap, pops the smallest cost first and,
/// among equal costs, the entry that was pushed first.
struct SmallestCostHolder {
    cost: i64,
    counter: usize,
    cell: Point,
    depth: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.counter == other.counter
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.counter.cmp(&self.counter),
            s => s,
        }
    }
}

/// Uniform-cost search ([Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)),
/// using C for straight moves and D for diagonal ones. Entries are only pushed when they strictly
/// improve the best known cost of a cell, and outdated entries are dropped when popped. The path
/// returned on the first pop of the target has minimal cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct UcsSolver;

impl GridSolver for UcsSolver {
    fn name(&self) -> &'static str {
        "UCS"
    }

    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome {
        info!("UCS from {} to {}", fmt_cell(&start), fmt_cell(&target));
        let mut counter = 0;
        let mut to_see = BinaryHeap::new();
        to_see.push(SmallestCostHolder {
            cost: 0,
            counter,
            cell: start,
            depth: 0,
        });
        let mut best_cost: FxHashMap<Point, i64> = FxHashMap::default();
        best_cost.insert(start, 0);
        let mut parents = ParentMap::with_root(start);
        let mut explored = CellSet::default();

        while let Some(SmallestCostHolder {
            cost, cell, depth, ..
        }) = to_see.pop()
        {
            // Lazy deletion: a cheaper entry for this cell was already handled.
            if !explored.insert(cell) {
                continue;
            }
            trace!("UCS exploring {} at cost {}", fmt_cell(&cell), cost);
            let snapshot = |status: Status| {
                Snapshot::new(search_sets(to_see.iter().map(|h| &h.cell), &explored), status)
            };
            let status = Status::Exploring {
                cell,
                side: Side::Forward,
                depth,
                cost,
            };
            if emit_with(sink, || snapshot(status)).is_break() {
                return cancelled(self.name());
            }
            if cell == target {
                return finish_found(self, sink, parents.path_to(&target), snapshot);
            }
            for (successor, move_cost) in grid.neighborhood_points_and_cost(&cell) {
                if explored.contains(&successor) {
                    continue;
                }
                let new_cost = cost + move_cost;
                if best_cost
                    .get(&successor)
                    .map_or(false, |&best| best <= new_cost)
                {
                    continue;
                }
                best_cost.insert(successor, new_cost);
                parents.relink(successor, &cell);
                counter += 1;
                to_see.push(SmallestCostHolder {
                    cost: new_cost,
                    counter,
                    cell: successor,
                    depth: depth + 1,
                });
            }
        }
        finish_no_path(sink, |status: Status| {
            Snapshot::new(search_sets(to_see.iter().map(|h| &h.cell), &explored), status)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::step::{NoopSink, RecordingSink};
    use crate::{C, D};
    use grid_util::grid::ValueGrid;

    #[test]
    fn diagonal_route_on_open_grid() {
        let grid = SearchGrid::new(3, 3, false);
        let outcome = UcsSolver.solve(&grid, cell(0, 0), cell(2, 2), &mut NoopSink);
        assert_eq!(outcome.path().unwrap(), &[cell(0, 0), cell(1, 1), cell(2, 2)]);
        assert!((outcome.cost_float().unwrap() - 2.828).abs() < 1e-9);
    }

    /// Going up-right is impossible, so the cheapest route to the top-right corner goes straight.
    #[test]
    fn missing_diagonal_forces_straight_moves() {
        let grid = SearchGrid::new(2, 2, false);
        let outcome = UcsSolver.solve(&grid, cell(1, 0), cell(0, 1), &mut NoopSink);
        assert_eq!(outcome.cost(), Some(2 * C));
    }

    /// A diagonal plus a straight move (2.414) beats going around with three straight moves.
    #[test]
    fn diagonal_shortcut_beats_detour() {
        // |S.|
        // |#.|
        // |.T|
        let grid: SearchGrid = "S.\n#.\n.T".parse().unwrap();
        let outcome = UcsSolver.solve(&grid, cell(0, 0), cell(2, 1), &mut NoopSink);
        assert_eq!(outcome.cost(), Some(C + D));
        assert_eq!(outcome.path().unwrap().len(), 3);
    }

    #[test]
    fn equal_costs_pop_in_insertion_order() {
        let grid = SearchGrid::new(3, 3, false);
        let mut sink = RecordingSink::new();
        UcsSolver.solve(&grid, cell(1, 1), cell(2, 0), &mut sink);
        // Straight neighbours, all at cost C, come out in movement order.
        assert_eq!(
            sink.statuses()[..5],
            [
                "exploring (1, 1)",
                "exploring (0, 1)",
                "exploring (1, 2)",
                "exploring (2, 1)",
                "exploring (1, 0)",
            ]
        );
    }

    #[test]
    fn holder_ordering() {
        let holder = |cost, counter| SmallestCostHolder {
            cost,
            counter,
            cell: cell(0, 0),
            depth: 0,
        };
        let mut heap = BinaryHeap::new();
        heap.push(holder(D, 0));
        heap.push(holder(C, 2));
        heap.push(holder(C, 1));
        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|h| (h.cost, h.counter))
            .collect();
        assert_eq!(order, vec![(C, 1), (C, 2), (D, 0)]);
    }
}
