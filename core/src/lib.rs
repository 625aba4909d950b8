#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tile map generators.
//!
//! This crate defines the grid model that every generation pass mutates.
//! Drivers allocate a [`Grid`], hand it to one or more pure systems together
//! with an explicitly injected random source, and finally render or score the
//! result. No pass keeps state about the grid beyond the duration of a call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contents of a single grid cell.
///
/// Variants are mutually exclusive; a cell never carries more than one tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Open floor.
    #[default]
    Empty,
    /// Impassable cell: map border, lattice pillar or filled dungeon cell.
    Wall,
    /// Wall that can be blown up during play.
    DestructibleWall,
    /// Destructible wall hiding a power-up.
    PowerUp(PowerUpKind),
    /// Enemy spawn position.
    Enemy(EnemyKind),
    /// Level exit hidden under a destructible wall.
    Exit,
    /// Final resting position of a random walker.
    Agent,
}

impl Cell {
    /// Reports whether the cell counts as occupied for neighbourhood rules.
    ///
    /// Every tag other than [`Cell::Empty`] is occupied.
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Reports whether the cell holds a power-up of any kind.
    #[must_use]
    pub const fn is_power_up(self) -> bool {
        matches!(self, Self::PowerUp(_))
    }

    /// Reports whether the cell holds an enemy of any kind.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Enemy(_))
    }
}

/// Power-ups that can hide under destructible walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Raises the number of bombs that can be placed at once.
    Bombs,
    /// Extends the blast radius.
    Flames,
    /// Increases movement speed.
    Speed,
    /// Allows bombs to be detonated on demand.
    Detonator,
}

impl PowerUpKind {
    /// Every power-up kind, used for uniform sampling.
    pub const ALL: [Self; 4] = [Self::Bombs, Self::Flames, Self::Speed, Self::Detonator];
}

/// Enemies that can be scattered over empty floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow balloon enemy.
    Ballom,
    /// Onion-shaped enemy.
    Onil,
    /// Barrel enemy.
    Dahl,
    /// Fast erratic enemy.
    Minvo,
}

impl EnemyKind {
    /// Every enemy kind, used for uniform sampling.
    pub const ALL: [Self; 4] = [Self::Ballom, Self::Onil, Self::Dahl, Self::Minvo];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Cardinal movement directions available to walkers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction, used for uniform sampling.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the neighbour of `cell` in this direction.
    ///
    /// Yields `None` when the step would leave a grid of the provided
    /// dimensions.
    #[must_use]
    pub fn offset(self, cell: CellCoord, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = (cell.column(), cell.row());
        let next = match self {
            Self::North => CellCoord::new(column, row.checked_sub(1)?),
            Self::East => CellCoord::new(column.checked_add(1)?, row),
            Self::South => CellCoord::new(column, row.checked_add(1)?),
            Self::West => CellCoord::new(column.checked_sub(1)?, row),
        };

        if next.column() < columns && next.row() < rows {
            Some(next)
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = cell.column();
        let row = cell.row();
        column >= self.origin.column()
            && row >= self.origin.row()
            && u64::from(column) < u64::from(self.origin.column()) + u64::from(self.size.width())
            && u64::from(row) < u64::from(self.origin.row()) + u64::from(self.size.height())
    }

    /// Number of cells covered by the rectangle.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.size.width() as u64 * self.size.height() as u64
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Errors raised while constructing or addressing a [`Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Row data did not contain a single cell.
    #[error("grid must contain at least one cell")]
    Empty,
    /// A row had a different width from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Cell data did not match the declared dimensions.
    #[error("grid of {columns}x{rows} cannot hold {cells} cells")]
    SizeMismatch {
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
        /// Number of cells supplied.
        cells: usize,
    },
    /// A coordinate fell outside the grid.
    #[error("cell ({}, {}) lies outside a {columns}x{rows} grid", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
}

/// Dense row-major matrix of [`Cell`] values with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot", into = "GridSnapshot")]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell empty.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self::filled(columns, rows, Cell::Empty)
    }

    /// Creates a grid of the provided dimensions with every cell set to `cell`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, cell: Cell) -> Self {
        let len = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cells: vec![cell; len],
        }
    }

    /// Builds a grid from explicit rows of cells.
    ///
    /// Every row must have the same non-zero width.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::RaggedRows {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        let columns = u32::try_from(expected).map_err(|_| GridError::SizeMismatch {
            columns: u32::MAX,
            rows: 0,
            cells: cells.len(),
        })?;
        let row_count = u32::try_from(rows.len()).map_err(|_| GridError::SizeMismatch {
            columns,
            rows: u32::MAX,
            cells: cells.len(),
        })?;

        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Fails with [`GridError::OutOfBounds`] when the coordinate lies outside the grid.
    pub fn ensure_contains(&self, cell: CellCoord) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                cell,
                columns: self.columns,
                rows: self.rows,
            })
        }
    }

    /// Returns the cell stored at the coordinate, if it lies within the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Stores `value` at the coordinate.
    ///
    /// Writes outside the grid are ignored; the grid never grows.
    pub fn set(&mut self, cell: CellCoord, value: Cell) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = value;
        }
    }

    /// Iterates over the rows of the grid from top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        // `max(1)` keeps `chunks` well-defined for zero-width grids, which have no cells.
        self.cells.chunks(self.columns.max(1) as usize)
    }

    /// Iterates over every coordinate and cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *cell)
        })
    }

    /// Counts the cells that satisfy `predicate`.
    #[must_use]
    pub fn count<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(Cell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(**cell)).count()
    }

    /// Read-only view of the row-major cell storage.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GridSnapshot {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = GridError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self, Self::Error> {
        let expected = snapshot.columns as usize * snapshot.rows as usize;
        if snapshot.cells.len() != expected {
            return Err(GridError::SizeMismatch {
                columns: snapshot.columns,
                rows: snapshot.rows,
                cells: snapshot.cells.len(),
            });
        }
        Ok(Self {
            columns: snapshot.columns,
            rows: snapshot.rows,
            cells: snapshot.cells,
        })
    }
}

impl From<Grid> for GridSnapshot {
    fn from(grid: Grid) -> Self {
        Self {
            columns: grid.columns,
            rows: grid.rows,
            cells: grid.cells,
        }
    }
}

/// Reasons a set of generation parameters is rejected at the configuration boundary.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ParameterError {
    /// A probability was negative, above one, or not a finite number.
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value that was supplied.
        value: f64,
    },
    /// A grid or room dimension was zero.
    #[error("{name} must be greater than zero")]
    ZeroDimension {
        /// Name of the offending parameter.
        name: &'static str,
    },
}

/// Fails unless `value` is a finite probability in `[0, 1]`.
pub fn check_probability(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::ProbabilityOutOfRange { name, value })
    }
}

/// Fails when a dimension is zero.
pub fn check_dimension(name: &'static str, value: u32) -> Result<(), ParameterError> {
    if value == 0 {
        Err(ParameterError::ZeroDimension { name })
    } else {
        Ok(())
    }
}

/// Density triple steering Bomberman content placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Densities {
    /// Share of free cells turned into destructible walls.
    pub destructible: f64,
    /// Share of destructible walls that hide a power-up.
    pub power_up: f64,
    /// Share of the remaining empty cells that receive an enemy.
    pub enemy: f64,
}

impl Densities {
    /// Creates a new density triple.
    #[must_use]
    pub const fn new(destructible: f64, power_up: f64, enemy: f64) -> Self {
        Self {
            destructible,
            power_up,
            enemy,
        }
    }

    /// Verifies that every density is a probability.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_probability("destructible", self.destructible)?;
        check_probability("power_up", self.power_up)?;
        check_probability("enemy", self.enemy)
    }
}

impl Default for Densities {
    fn default() -> Self {
        Self::new(0.4, 0.1, 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stops_at_every_edge() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(Direction::North.offset(corner, 3, 3), None);
        assert_eq!(Direction::West.offset(corner, 3, 3), None);
        assert_eq!(
            Direction::East.offset(corner, 3, 3),
            Some(CellCoord::new(1, 0))
        );

        let far = CellCoord::new(2, 2);
        assert_eq!(Direction::East.offset(far, 3, 3), None);
        assert_eq!(Direction::South.offset(far, 3, 3), None);
        assert_eq!(
            Direction::North.offset(far, 3, 3),
            Some(CellCoord::new(2, 1))
        );
    }

    #[test]
    fn writes_outside_the_grid_are_ignored() {
        let mut grid = Grid::new(4, 2);
        grid.set(CellCoord::new(4, 0), Cell::Wall);
        grid.set(CellCoord::new(0, 2), Cell::Wall);
        assert_eq!(grid.count(Cell::is_occupied), 0);
        assert_eq!(grid.len(), 8);
    }

    #[test]
    fn iter_visits_cells_in_row_major_order() {
        let mut grid = Grid::new(3, 2);
        grid.set(CellCoord::new(2, 0), Cell::Exit);
        grid.set(CellCoord::new(0, 1), Cell::Agent);

        let visited: Vec<_> = grid.iter().collect();
        assert_eq!(visited[2], (CellCoord::new(2, 0), Cell::Exit));
        assert_eq!(visited[3], (CellCoord::new(0, 1), Cell::Agent));
        let rows: Vec<_> = grid.iter_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[Cell::Agent, Cell::Empty, Cell::Empty][..]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let error = Grid::from_rows(vec![vec![Cell::Empty; 3], vec![Cell::Wall; 2]])
            .expect_err("ragged rows must be rejected");
        assert_eq!(
            error,
            GridError::RaggedRows {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(Grid::from_rows(Vec::new()), Err(GridError::Empty));
    }

    #[test]
    fn ensure_contains_reports_out_of_bounds() {
        let grid = Grid::new(5, 5);
        assert!(grid.ensure_contains(CellCoord::new(4, 4)).is_ok());
        assert_eq!(
            grid.ensure_contains(CellCoord::new(5, 1)),
            Err(GridError::OutOfBounds {
                cell: CellCoord::new(5, 1),
                columns: 5,
                rows: 5
            })
        );
    }

    #[test]
    fn rect_contains_matches_area() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(1, 2), CellRectSize::new(3, 2));
        let grid = Grid::new(6, 6);
        let covered = grid.iter().filter(|(cell, _)| rect.contains(*cell)).count();
        assert_eq!(covered as u64, rect.area());
        assert!(rect.contains(CellCoord::new(3, 3)));
        assert!(!rect.contains(CellCoord::new(4, 3)));
    }

    #[test]
    fn probabilities_are_validated() {
        assert!(Densities::default().validate().is_ok());
        assert_eq!(
            Densities::new(0.4, 1.5, 0.05).validate(),
            Err(ParameterError::ProbabilityOutOfRange {
                name: "power_up",
                value: 1.5
            })
        );
        assert!(check_probability("enemy", f64::NAN).is_err());
        assert!(check_dimension("columns", 0).is_err());
    }

    #[test]
    fn grid_round_trips_through_bincode() {
        let mut grid = Grid::new(3, 3);
        grid.set(CellCoord::new(1, 1), Cell::PowerUp(PowerUpKind::Speed));
        grid.set(CellCoord::new(2, 1), Cell::Enemy(EnemyKind::Minvo));

        let bytes = bincode::serialize(&grid).expect("serialize");
        let restored: Grid = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, grid);
    }

    #[test]
    fn mismatched_snapshot_is_rejected() {
        let snapshot = GridSnapshot {
            columns: 2,
            rows: 2,
            cells: vec![Cell::Empty; 3],
        };
        assert!(Grid::try_from(snapshot).is_err());
    }
}
