use crate::convert_cost_to_unit_cost_float;
use crate::reconstruct::path_cost;
use crate::search_grid::SearchGrid;
use crate::step::{
    emit_with, CellSet, FoundPath, SearchOutcome, SearchSets, Snapshot, Status, StepSink,
};
use grid_util::point::Point;
use log::info;

pub mod bfs;
pub mod bidirectional;
pub mod dfs;
pub mod dls;
pub mod iddfs;
pub mod ucs;

/// A search strategy over a [SearchGrid]. Implementations expect a validated problem: start and
/// target in bounds, not walls and distinct (see [SearchProblem](crate::problem::SearchProblem)).
pub trait GridSolver {
    fn name(&self) -> &'static str;

    /// Searches from `start` to `target`, emitting a snapshot to `sink` after every finalized
    /// cell and a final one on termination.
    fn solve<S: StepSink + ?Sized>(
        &self,
        grid: &SearchGrid,
        start: Point,
        target: Point,
        sink: &mut S,
    ) -> SearchOutcome;

    fn get_path_cost(&self, path: &[Point]) -> i64 {
        path_cost(path)
    }
    fn get_path_cost_float(&self, path: &[Point]) -> f64 {
        convert_cost_to_unit_cost_float(self.get_path_cost(path))
    }
}

/// Collects the cells of a queue or stack into a set, dropping duplicates and anything already
/// explored.
pub(crate) fn frontier_set<'a, I>(cells: I, explored: &CellSet) -> CellSet
where
    I: IntoIterator<Item = &'a Point>,
{
    cells
        .into_iter()
        .filter(|p| !explored.contains(*p))
        .copied()
        .collect()
}

/// Copies pending and explored cells into a [SearchSets].
pub(crate) fn search_sets<'a, I>(cells: I, explored: &CellSet) -> SearchSets
where
    I: IntoIterator<Item = &'a Point>,
{
    SearchSets::new(frontier_set(cells, explored), explored.clone())
}

/// Emits the success snapshot and wraps up the path, costed by `solver`. `snapshot` builds the
/// final view for the given status.
pub(crate) fn finish_found<G, S, F>(
    solver: &G,
    sink: &mut S,
    path: Vec<Point>,
    snapshot: F,
) -> SearchOutcome
where
    G: GridSolver + ?Sized,
    S: StepSink + ?Sized,
    F: FnOnce(Status) -> Snapshot,
{
    let cost = solver.get_path_cost(&path);
    info!(
        "{} found a path of {} cells, cost {:.3}",
        solver.name(),
        path.len(),
        solver.get_path_cost_float(&path)
    );
    let _ = emit_with(sink, || snapshot(Status::Found { cost }).with_path(path.clone()));
    SearchOutcome::Found(FoundPath { path, cost })
}

/// Emits the failure snapshot.
pub(crate) fn finish_no_path<S, F>(sink: &mut S, snapshot: F) -> SearchOutcome
where
    S: StepSink + ?Sized,
    F: FnOnce(Status) -> Snapshot,
{
    info!("Search space exhausted, no path");
    let _ = emit_with(sink, || snapshot(Status::NoPath));
    SearchOutcome::NoPath
}

/// Logs and reports a cancelled run.
pub(crate) fn cancelled(name: &str) -> SearchOutcome {
    info!("{} cancelled by its step sink", name);
    SearchOutcome::Cancelled
}
