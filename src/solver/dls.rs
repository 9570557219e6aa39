use fxhash::FxHashMap;
use grid_util::point::Point;
use log::{debug, info, trace};

use crate::fmt_cell;
use crate::reconstruct::ParentMap;
use crate::search_grid::SearchGrid;
use crate::solver::{cancelled, finish_found, finish_no_path, search_sets, GridSolver};
use crate::step::{
    emit_with, CellSet, SearchOutcome, SearchSets, Side, Snapshot, Status, StepSink,
};

/// Depth-first search that stops extending a branch once it is `limit` steps deep. A node at
/// the limit is still explored and tested against the target. Failing to find a target that
/// lies deeper than the limit is a regular [SearchOutcome::NoPath].
///
/// A cell reached again by a strictly shorter route is explored again, so it can show up in
/// more than one exploring snapshot.
#[derive(Clone, Copy, Debug)]
pub struct DlsSolver {
    pub limit: usize,
}

impl DlsSolver {
    pub fn new(limit: usize) -> DlsSolver {
        DlsSolver { limit }
    }
}

impl GridSolver for DlsSolver {
    fn name(&self) -> &'static str {
        "DLS"
    }

    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome {
        info!(
            "DLS from {} to {} with limit {}",
            fmt_cell(&start),
            fmt_cell(&target),
            self.limit
        );
        let pass = depth_limited_pass(grid, start, target, self.limit, sink);
        match pass.result {
            PassResult::Found(path) => {
                finish_found(self, sink, path, |status| Snapshot::new(pass.sets, status))
            }
            PassResult::Exhausted { .. } => {
                finish_no_path(sink, |status| Snapshot::new(pass.sets, status))
            }
            PassResult::Cancelled => cancelled(self.name()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PassResult {
    Found(Vec<Point>),
    /// The target was not reached. `cut_off` tells whether the limit stopped some branch that
    /// could have reached new cells; if not, a deeper pass would explore exactly the same cells.
    Exhausted { cut_off: bool },
    Cancelled,
}

/// Outcome of one depth-limited pass along with the frontier and explored cells it ended with.
#[derive(Clone, Debug)]
pub(crate) struct DepthLimitedPass {
    pub result: PassResult,
    pub sets: SearchSets,
}

struct StackEntry {
    cell: Point,
    parent: Option<Point>,
    depth: usize,
    cost: i64,
}

/// One depth-limited depth-first pass, emitting an exploring snapshot per finalized cell but no
/// terminal snapshot.
///
/// Each cell remembers the smallest depth it has been pushed at. A cell is pushed again only if
/// it is reached in strictly fewer steps; it then leaves the explored set and the older, deeper
/// stack entry is dropped when popped. This keeps the pass complete within its limit: whenever
/// a path of at most `limit` steps exists, one is found.
pub(crate) fn depth_limited_pass<S: StepSink + ?Sized>(
    grid: &SearchGrid,
    start: Point,
    target: Point,
    limit: usize,
    sink: &mut S,
) -> DepthLimitedPass {
    let mut stack = vec![StackEntry {
        cell: start,
        parent: None,
        depth: 0,
        cost: 0,
    }];
    let mut best_depth: FxHashMap<Point, usize> = FxHashMap::default();
    best_depth.insert(start, 0);
    let mut parents = ParentMap::with_root(start);
    let mut explored = CellSet::default();
    let mut cut_off = false;

    while let Some(entry) = stack.pop() {
        let stale = best_depth
            .get(&entry.cell)
            .map_or(false, |&best| best < entry.depth);
        if stale || explored.contains(&entry.cell) {
            continue;
        }
        if let Some(parent) = entry.parent {
            parents.relink(entry.cell, &parent);
        }
        explored.insert(entry.cell);
        trace!(
            "DLS exploring {} at depth {}/{}",
            fmt_cell(&entry.cell),
            entry.depth,
            limit
        );
        let status = Status::Exploring {
            cell: entry.cell,
            side: Side::Forward,
            depth: entry.depth,
            cost: entry.cost,
        };
        let flow = emit_with(sink, || {
            Snapshot::new(search_sets(stack.iter().map(|e| &e.cell), &explored), status)
        });
        if flow.is_break() {
            return DepthLimitedPass {
                result: PassResult::Cancelled,
                sets: search_sets(stack.iter().map(|e| &e.cell), &explored),
            };
        }
        if entry.cell == target {
            return DepthLimitedPass {
                result: PassResult::Found(parents.path_to(&target)),
                sets: search_sets(stack.iter().map(|e| &e.cell), &explored),
            };
        }

        let depth = entry.depth + 1;
        let improves = |n: &Point, best_depth: &FxHashMap<Point, usize>| {
            best_depth.get(n).map_or(true, |&b| depth < b)
        };
        if entry.depth >= limit {
            if grid
                .neighborhood_points_and_cost(&entry.cell)
                .iter()
                .any(|(n, _)| improves(n, &best_depth))
            {
                cut_off = true;
            }
            continue;
        }
        for (n, c) in grid.neighborhood_points_and_cost(&entry.cell) {
            if improves(&n, &best_depth) {
                best_depth.insert(n, depth);
                // Reached in fewer steps than before: back to the frontier.
                explored.shift_remove(&n);
                stack.push(StackEntry {
                    cell: n,
                    parent: Some(entry.cell),
                    depth,
                    cost: entry.cost + c,
                });
            }
        }
    }
    debug!("DLS pass with limit {} exhausted, cut off: {}", limit, cut_off);
    DepthLimitedPass {
        result: PassResult::Exhausted { cut_off },
        sets: SearchSets::new(CellSet::default(), explored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::step::{NoopSink, RecordingSink};
    use grid_util::grid::ValueGrid;

    #[test]
    fn limit_zero_never_expands() {
        let grid = SearchGrid::new(3, 3, false);
        let mut sink = RecordingSink::new();
        let outcome = DlsSolver::new(0).solve(&grid, cell(0, 0), cell(0, 1), &mut sink);
        assert_eq!(outcome, SearchOutcome::NoPath);
        assert_eq!(sink.statuses(), ["exploring (0, 0)", "no path found"]);
    }

    #[test]
    fn target_beyond_limit_is_not_found() {
        let grid = SearchGrid::new(6, 1, false);
        let start = cell(0, 0);
        let target = cell(0, 5);
        let outcome = DlsSolver::new(4).solve(&grid, start, target, &mut NoopSink);
        assert_eq!(outcome, SearchOutcome::NoPath);
        let outcome = DlsSolver::new(5).solve(&grid, start, target, &mut NoopSink);
        assert_eq!(outcome.path().unwrap().len(), 6);
    }

    #[test]
    fn path_never_exceeds_limit() {
        let grid = SearchGrid::new(5, 5, false);
        for limit in 0..8 {
            let outcome =
                DlsSolver::new(limit).solve(&grid, cell(0, 4), cell(4, 0), &mut NoopSink);
            if let Some(path) = outcome.path() {
                assert!(path.len() <= limit + 1);
                assert!(grid.is_valid_path(path));
            }
        }
    }

    /// Up-left is expanded first, so (0, 2) is first reached in three steps around the left
    /// side. With a limit of three it must be reopened once the two step route through (1, 2)
    /// turns up, otherwise the target behind it stays out of reach.
    #[test]
    fn shallower_route_reopens_cell() {
        // |....|
        // |...#|
        // |##S#|
        let grid: SearchGrid = "....\n...#\n##.#".parse().unwrap();
        let mut sink = RecordingSink::new();
        let pass = depth_limited_pass(&grid, cell(2, 2), cell(0, 3), 3, &mut sink);
        assert_eq!(
            pass.result,
            PassResult::Found(vec![cell(2, 2), cell(1, 2), cell(0, 2), cell(0, 3)])
        );
        let reopened = sink
            .snapshots
            .iter()
            .filter(|s| matches!(s.status, Status::Exploring { cell: c, .. } if c == cell(0, 2)))
            .count();
        assert_eq!(reopened, 2);
        for snapshot in &sink.snapshots {
            for p in &snapshot.forward.frontier {
                assert!(!snapshot.forward.explored.contains(p));
            }
        }
    }

    #[test]
    fn uncut_pass_reports_completion() {
        let grid: SearchGrid = "..#.".parse().unwrap();
        let pass = depth_limited_pass(&grid, cell(0, 0), cell(0, 3), 5, &mut NoopSink);
        assert_eq!(pass.result, PassResult::Exhausted { cut_off: false });
        let pass = depth_limited_pass(&grid, cell(0, 0), cell(0, 3), 0, &mut NoopSink);
        assert_eq!(pass.result, PassResult::Exhausted { cut_off: true });
    }
}
