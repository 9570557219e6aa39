//! Progress reporting. Every algorithm emits a [Snapshot] to a [StepSink] right after it
//! finalizes a cell, and once more when it terminates.
use crate::{convert_cost_to_unit_cost_float, fmt_cell};
use core::fmt;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use std::ops::ControlFlow;

/// Insertion-ordered set of cells, so snapshots list cells in a reproducible order.
pub type CellSet = IndexSet<Point, FxBuildHasher>;

/// Which search tree a cell belongs to. Only bidirectional search has a backward side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Forward,
    Backward,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// A cell has just been finalized. `depth` counts steps from the root of its side and `cost`
    /// is the integer cost of the route it was reached by.
    Exploring {
        cell: Point,
        side: Side,
        depth: usize,
        cost: i64,
    },
    /// Iterative deepening starts a new pass.
    Deepening { limit: usize },
    /// A depth-limited pass finished without reaching the target.
    Exhausted { limit: usize },
    Found { cost: i64 },
    NoPath,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Exploring {
                cell,
                side: Side::Forward,
                ..
            } => write!(f, "exploring {}", fmt_cell(cell)),
            Status::Exploring {
                cell,
                side: Side::Backward,
                ..
            } => write!(f, "exploring {} (backward)", fmt_cell(cell)),
            Status::Deepening { limit } => write!(f, "searching with limit={}", limit),
            Status::Exhausted { limit } => write!(f, "exhausted limit={}, deepening…", limit),
            Status::Found { cost } => write!(
                f,
                "path found, cost = {:.2}",
                convert_cost_to_unit_cost_float(*cost)
            ),
            Status::NoPath => write!(f, "no path found"),
        }
    }
}

/// Pending and finalized cells of one search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchSets {
    pub frontier: CellSet,
    pub explored: CellSet,
}

impl SearchSets {
    pub fn new(frontier: CellSet, explored: CellSet) -> SearchSets {
        SearchSets { frontier, explored }
    }
}

/// Frozen view of a search at one instant. Owns copies of everything it shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub forward: SearchSets,
    pub backward: Option<SearchSets>,
    pub path: Option<Vec<Point>>,
    pub status: Status,
}

impl Snapshot {
    pub fn new(forward: SearchSets, status: Status) -> Snapshot {
        Snapshot {
            forward,
            backward: None,
            path: None,
            status,
        }
    }
    pub fn with_backward(mut self, backward: SearchSets) -> Snapshot {
        self.backward = Some(backward);
        self
    }
    pub fn with_path(mut self, path: Vec<Point>) -> Snapshot {
        self.path = Some(path);
        self
    }
    /// Whether the cell is pending on either side.
    pub fn in_frontier(&self, p: &Point) -> bool {
        self.forward.frontier.contains(p)
            || self
                .backward
                .as_ref()
                .map_or(false, |b| b.frontier.contains(p))
    }
    /// Whether the cell is finalized on either side.
    pub fn in_explored(&self, p: &Point) -> bool {
        self.forward.explored.contains(p)
            || self
                .backward
                .as_ref()
                .map_or(false, |b| b.explored.contains(p))
    }
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, Status::Found { .. } | Status::NoPath)
    }
}

/// Receiver of search progress. The call is synchronous: the algorithm waits until it returns.
/// Returning [ControlFlow::Break] from a non-terminal snapshot cancels the run.
pub trait StepSink {
    fn emit(&mut self, snapshot: Snapshot) -> ControlFlow<()>;

    /// Sinks that ignore snapshots return false so that none are built.
    fn enabled(&self) -> bool {
        true
    }
}

impl<F> StepSink for F
where
    F: FnMut(Snapshot) -> ControlFlow<()>,
{
    fn emit(&mut self, snapshot: Snapshot) -> ControlFlow<()> {
        self(snapshot)
    }
}

/// Discards everything, for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl StepSink for NoopSink {
    fn emit(&mut self, _: Snapshot) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
    fn enabled(&self) -> bool {
        false
    }
}

/// Keeps every snapshot. With a `step_limit`, asks the search to stop once that many snapshots
/// have been received.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub snapshots: Vec<Snapshot>,
    pub step_limit: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink::default()
    }
    pub fn with_step_limit(step_limit: usize) -> RecordingSink {
        RecordingSink {
            snapshots: Vec::new(),
            step_limit: Some(step_limit),
        }
    }
    pub fn statuses(&self) -> Vec<String> {
        self.snapshots.iter().map(|s| s.status.to_string()).collect()
    }
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

impl StepSink for RecordingSink {
    fn emit(&mut self, snapshot: Snapshot) -> ControlFlow<()> {
        self.snapshots.push(snapshot);
        match self.step_limit {
            Some(limit) if self.snapshots.len() >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Emits the snapshot built by `build` unless the sink is disabled.
pub(crate) fn emit_with<S, F>(sink: &mut S, build: F) -> ControlFlow<()>
where
    S: StepSink + ?Sized,
    F: FnOnce() -> Snapshot,
{
    if sink.enabled() {
        sink.emit(build())
    } else {
        ControlFlow::Continue(())
    }
}

/// A path from start to target, both inclusive, with its integer cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundPath {
    pub path: Vec<Point>,
    pub cost: i64,
}

/// Result of a run. Exhausting the search space is a normal [SearchOutcome::NoPath] outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(FoundPath),
    NoPath,
    /// The sink asked the search to stop before it terminated.
    Cancelled,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchOutcome::Found(found) => Some(&found.path),
            _ => None,
        }
    }
    pub fn into_path(self) -> Option<Vec<Point>> {
        match self {
            SearchOutcome::Found(found) => Some(found.path),
            _ => None,
        }
    }
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
    pub fn cost(&self) -> Option<i64> {
        match self {
            SearchOutcome::Found(found) => Some(found.cost),
            _ => None,
        }
    }
    pub fn cost_float(&self) -> Option<f64> {
        self.cost().map(convert_cost_to_unit_cost_float)
    }
}
