use crate::{C, D, N_SMALLVEC_SIZE};
use core::fmt;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use itertools::Itertools;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::str::FromStr;
use thiserror::Error;

/// One of the six moves allowed on the grid. Up-right and down-left are deliberately missing,
/// which still leaves a symmetric topology as every move has its inverse in the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Right,
    Down,
    DownRight,
    Left,
    UpLeft,
}

impl MoveDirection {
    /// All directions in expansion order. This order is the tie-break for every algorithm.
    pub const ALL: [MoveDirection; 6] = [
        MoveDirection::Up,
        MoveDirection::Right,
        MoveDirection::Down,
        MoveDirection::DownRight,
        MoveDirection::Left,
        MoveDirection::UpLeft,
    ];

    /// Offset as `(dx, dy)`, i.e. `(column delta, row delta)`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            MoveDirection::Up => (0, -1),
            MoveDirection::Right => (1, 0),
            MoveDirection::Down => (0, 1),
            MoveDirection::DownRight => (1, 1),
            MoveDirection::Left => (-1, 0),
            MoveDirection::UpLeft => (-1, -1),
        }
    }
    pub fn is_diagonal(self) -> bool {
        matches!(self, MoveDirection::DownRight | MoveDirection::UpLeft)
    }
    /// Uses C as cost for straight moves and D for diagonal moves.
    pub fn cost(self) -> i64 {
        if self.is_diagonal() {
            D
        } else {
            C
        }
    }
    pub fn apply(self, p: &Point) -> Point {
        let (dx, dy) = self.offset();
        Point::new(p.x + dx, p.y + dy)
    }
    /// The direction leading from `from` to `to`, if they are one move apart.
    pub fn between(from: &Point, to: &Point) -> Option<MoveDirection> {
        let delta = (to.x - from.x, to.y - from.y);
        MoveDirection::ALL
            .into_iter()
            .find(|dir| dir.offset() == delta)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, tile: char },
}

/// [SearchGrid] holds the [bool] values of a [BoolGrid] that determine whether a cell is a wall
/// ([true]) or empty ([false]). Connected components of the six-direction topology are kept in a
/// [UnionFind] structure for quick reachability checks. Implements [ValueGrid] by building on
/// [BoolGrid].
#[derive(Clone, Debug)]
pub struct SearchGrid {
    pub grid: BoolGrid,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl SearchGrid {
    /// Builds a grid from rows of 0 (empty) and 1 (wall) values.
    pub fn from_matrix<R: AsRef<[u8]>>(rows: &[R]) -> Result<SearchGrid, GridError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut search_grid = SearchGrid::new(width, rows.len(), false);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                if value > 1 {
                    return Err(GridError::UnknownTile {
                        row: y,
                        col: x,
                        tile: char::from_digit(value as u32, 10).unwrap_or('?'),
                    });
                }
                search_grid.grid.set(x as i32, y as i32, value == 1);
            }
        }
        search_grid.generate_components();
        Ok(search_grid)
    }

    pub fn rows(&self) -> usize {
        self.grid.height()
    }
    pub fn cols(&self) -> usize {
        self.grid.width()
    }

    /// Valid neighbours of `pos` in [MoveDirection::ALL] order, paired with the move cost.
    pub fn neighborhood_points_and_cost(
        &self,
        pos: &Point,
    ) -> SmallVec<[(Point, i64); N_SMALLVEC_SIZE]> {
        MoveDirection::ALL
            .into_iter()
            .map(|dir| (dir.apply(pos), dir.cost()))
            .filter(|(p, _)| self.can_move_to(*p))
            .collect()
    }
    pub fn can_move_to(&self, pos: Point) -> bool {
        self.in_bounds(pos.x, pos.y) && !self.grid.get(pos.x, pos.y)
    }
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.index_in_bounds(x, y)
    }
    pub fn is_wall(&self, pos: &Point) -> bool {
        self.grid.get(pos.x, pos.y)
    }

    /// Checks that a path is non-empty, stays on empty cells and that each step is one of the
    /// six moves.
    pub fn is_valid_path(&self, path: &[Point]) -> bool {
        !path.is_empty()
            && path.iter().all(|p| self.can_move_to(*p))
            && path
                .iter()
                .tuple_windows()
                .all(|(a, b)| MoveDirection::between(a, b).is_some())
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.can_move_to(*start) && self.can_move_to(*goal) {
            let start_ix = self.grid.get_ix_point(start);
            let goal_ix = self.grid.get_ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    /// Only the forward half of the moves is needed since every move has its inverse.
    pub fn generate_components(&mut self) {
        let w = self.grid.width;
        let h = self.grid.height;
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                let point = Point::new(x, y);
                if !self.can_move_to(point) {
                    continue;
                }
                let parent_ix = self.grid.get_ix_point(&point);
                for dir in [
                    MoveDirection::Right,
                    MoveDirection::Down,
                    MoveDirection::DownRight,
                ] {
                    let n = dir.apply(&point);
                    if self.can_move_to(n) {
                        let ix = self.grid.get_ix_point(&n);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }
}

impl FromStr for SearchGrid {
    type Err = GridError;

    /// Parses a text map, one line per row. `.`, `0`, `S`, `G` and `T` are empty cells while
    /// `#`, `@`, `1`, `O` and `W` are walls.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .skip_while(|l| l.is_empty())
            .collect();
        let lines = match lines.iter().rposition(|l| !l.is_empty()) {
            Some(last) => &lines[..=last],
            None => return Err(GridError::Empty),
        };
        let rows = lines
            .iter()
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, tile)| match tile {
                        '.' | '0' | 'S' | 'G' | 'T' => Ok(0),
                        '#' | '@' | '1' | 'O' | 'W' => Ok(1),
                        _ => Err(GridError::UnknownTile {
                            row: y,
                            col: x,
                            tile,
                        }),
                    })
                    .collect::<Result<Vec<u8>, GridError>>()
            })
            .collect::<Result<Vec<Vec<u8>>, GridError>>()?;
        SearchGrid::from_matrix(&rows)
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.grid.height as i32 {
            let row = (0..self.grid.width as i32)
                .map(|x| if self.grid.get(x, y) { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl ValueGrid<bool> for SearchGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        let mut base_grid = SearchGrid {
            grid: BoolGrid::new(width, height, default_value),
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        base_grid.generate_components();
        base_grid
    }
    fn get(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y)
    }
    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    fn set(&mut self, x: i32, y: i32, blocked: bool) {
        let p = Point::new(x, y);
        if blocked {
            if !self.grid.get(x, y) {
                self.components_dirty = true;
            }
            self.grid.set(x, y, blocked);
        } else {
            self.grid.set(x, y, blocked);
            let p_ix = self.grid.get_ix_point(&p);
            for (n, _) in self.neighborhood_points_and_cost(&p) {
                self.components.union(p_ix, self.grid.get_ix_point(&n));
            }
        }
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}
