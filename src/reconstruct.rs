//! Turns parent maps into paths. Parents are stored by index into an [IndexMap], in the same
//! way [pathfinding's astar][astar] keeps them, which makes walking a chain a series of cheap
//! index lookups.
//!
//! [astar]: https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html
use crate::search_grid::MoveDirection;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use itertools::Itertools;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index of the root.
const ROOT: usize = usize::MAX;

/// Maps each discovered cell to the cell it was reached from.
#[derive(Clone, Debug, Default)]
pub struct ParentMap {
    parents: FxIndexMap<Point, usize>,
}

impl ParentMap {
    pub fn with_root(root: Point) -> ParentMap {
        let mut parents = FxIndexMap::default();
        parents.insert(root, ROOT);
        ParentMap { parents }
    }

    /// Records `parent` as the parent of `child` unless `child` already has one. Returns whether
    /// the child was new. `parent` must already be present.
    pub fn discover(&mut self, child: Point, parent: &Point) -> bool {
        let Some(parent_ix) = self.parents.get_index_of(parent) else {
            return false;
        };
        match self.parents.entry(child) {
            Vacant(e) => {
                e.insert(parent_ix);
                true
            }
            Occupied(_) => false,
        }
    }

    /// Records `parent` as the parent of `child`, replacing any earlier parent.
    pub fn relink(&mut self, child: Point, parent: &Point) {
        if let Some(parent_ix) = self.parents.get_index_of(parent) {
            self.parents.insert(child, parent_ix);
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.parents.contains_key(p)
    }
    pub fn parent(&self, p: &Point) -> Option<&Point> {
        let &parent_ix = self.parents.get(p)?;
        self.parents.get_index(parent_ix).map(|(node, _)| node)
    }
    pub fn len(&self) -> usize {
        self.parents.len()
    }
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// The chain of cells from `from` back to the root, both inclusive. Empty if `from` was never
    /// discovered.
    pub fn chain(&self, from: &Point) -> Vec<Point> {
        // A chain can never be longer than the map, which also stops a corrupt cycle.
        std::iter::successors(self.parents.get_key_value(from), |&(_, &parent)| {
            self.parents.get_index(parent)
        })
        .map(|(node, _)| *node)
        .take(self.parents.len())
        .collect()
    }

    /// The path from the root to `node`, both inclusive.
    pub fn path_to(&self, node: &Point) -> Vec<Point> {
        let mut path = self.chain(node);
        path.reverse();
        path
    }
}

/// Joins a forward tree rooted at the start and a backward tree rooted at the target at the
/// cell where they meet. The meeting cell appears exactly once.
pub fn stitch(forward: &ParentMap, backward: &ParentMap, meeting: &Point) -> Vec<Point> {
    let mut path = forward.path_to(meeting);
    path.extend(backward.chain(meeting).into_iter().skip(1));
    path
}

/// Sums the integer move costs along a path. Steps that are not a single move are ignored.
pub fn path_cost(path: &[Point]) -> i64 {
    path.iter()
        .tuple_windows()
        .filter_map(|(a, b)| MoveDirection::between(a, b))
        .map(MoveDirection::cost)
        .sum()
}
