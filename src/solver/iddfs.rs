use grid_util::point::Point;
use log::{debug, info, warn};

use crate::fmt_cell;
use crate::search_grid::SearchGrid;
use crate::solver::dls::{depth_limited_pass, PassResult};
use crate::solver::{cancelled, finish_found, finish_no_path, GridSolver};
use crate::step::{emit_with, SearchOutcome, SearchSets, Snapshot, Status, StepSink};

/// Iterative deepening: depth-limited passes with limits 0, 1, 2, ... until one reaches the
/// target. Every pass starts from scratch, trading repeated work for a stack no deeper than the
/// current limit. The first successful limit equals the fewest steps needed, so the path has as
/// few cells as a breadth-first one.
#[derive(Clone, Copy, Debug)]
pub struct IddfsSolver {
    /// Largest limit tried. Defaults to rows × cols, which no simple path can exceed.
    pub max_limit: Option<usize>,
    /// Stop deepening once a pass was never cut short by its limit, since deeper passes would
    /// explore the very same cells.
    pub stop_when_complete: bool,
}

impl Default for IddfsSolver {
    fn default() -> IddfsSolver {
        IddfsSolver {
            max_limit: None,
            stop_when_complete: true,
        }
    }
}

impl IddfsSolver {
    pub fn new() -> IddfsSolver {
        IddfsSolver::default()
    }
}

impl GridSolver for IddfsSolver {
    fn name(&self) -> &'static str {
        "IDDFS"
    }

    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome {
        let cap = self.max_limit.unwrap_or(grid.rows() * grid.cols());
        info!(
            "IDDFS from {} to {} with limits up to {}",
            fmt_cell(&start),
            fmt_cell(&target),
            cap
        );
        let mut last_sets = SearchSets::default();
        for limit in 0..=cap {
            debug!("IDDFS deepening to limit {}", limit);
            let flow = emit_with(sink, || {
                Snapshot::new(SearchSets::default(), Status::Deepening { limit })
            });
            if flow.is_break() {
                return cancelled(self.name());
            }
            let pass = depth_limited_pass(grid, start, target, limit, sink);
            match pass.result {
                PassResult::Found(path) => {
                    return finish_found(self, sink, path, |status| {
                        Snapshot::new(pass.sets, status)
                    });
                }
                PassResult::Cancelled => return cancelled(self.name()),
                PassResult::Exhausted { cut_off } => {
                    let flow = emit_with(sink, || {
                        Snapshot::new(pass.sets.clone(), Status::Exhausted { limit })
                    });
                    if flow.is_break() {
                        return cancelled(self.name());
                    }
                    last_sets = pass.sets;
                    if !cut_off && self.stop_when_complete {
                        debug!(
                            "IDDFS pass with limit {} reached every cell it could, stopping",
                            limit
                        );
                        return finish_no_path(sink, |status| Snapshot::new(last_sets, status));
                    }
                }
            }
        }
        warn!("IDDFS reached its absolute depth cap of {}", cap);
        finish_no_path(sink, |status| Snapshot::new(last_sets, status))
    }
}
