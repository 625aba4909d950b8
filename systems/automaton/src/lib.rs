#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cellular automaton smoothing for dungeon-style occupancy grids.
//!
//! Every cell counts the occupied cells inside the square window of radius
//! `R` centred on it (the cell itself included, positions beyond the map edge
//! counted as occupied) and becomes a wall when the count reaches the
//! threshold `U`. Cells holding [`Cell::Agent`] are left untouched.
//!
//! Two update strategies are offered because they produce different maps over
//! several iterations:
//!
//! * [`UpdateMode::DoubleBuffered`] reads every neighbourhood from the grid as
//!   it was before the sweep and applies all updates at once.
//! * [`UpdateMode::InPlace`] writes each result immediately, so cells later in
//!   the row-major sweep observe earlier updates.

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tilemap_pcg_core::{check_probability, Cell, CellCoord, Grid, ParameterError};

/// Neighbourhood rule applied to every cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonRule {
    /// Half-width of the square neighbourhood window.
    pub radius: u32,
    /// Minimum occupied count for a cell to become a wall.
    pub threshold: u32,
}

impl AutomatonRule {
    /// Creates a new rule.
    #[must_use]
    pub const fn new(radius: u32, threshold: u32) -> Self {
        Self { radius, threshold }
    }
}

impl Default for AutomatonRule {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

/// Strategy used to apply updates during a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    /// Updates are computed from the previous generation and applied atomically.
    #[default]
    DoubleBuffered,
    /// Updates become visible to later cells of the same sweep.
    InPlace,
}

/// Cellular automaton system bound to a rule and update strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellularAutomaton {
    rule: AutomatonRule,
    mode: UpdateMode,
}

impl CellularAutomaton {
    /// Creates a new automaton.
    #[must_use]
    pub const fn new(rule: AutomatonRule, mode: UpdateMode) -> Self {
        Self { rule, mode }
    }

    /// Runs a single sweep over the grid.
    pub fn step(&self, grid: &mut Grid) {
        match self.mode {
            UpdateMode::DoubleBuffered => {
                let previous = grid.clone();
                for (cell, value) in previous.iter() {
                    if value != Cell::Agent {
                        grid.set(cell, self.next_state(&previous, cell));
                    }
                }
            }
            UpdateMode::InPlace => {
                for row in 0..grid.rows() {
                    for column in 0..grid.columns() {
                        let cell = CellCoord::new(column, row);
                        if grid.get(cell) != Some(Cell::Agent) {
                            let next = self.next_state(grid, cell);
                            grid.set(cell, next);
                        }
                    }
                }
            }
        }
    }

    /// Runs `iterations` sweeps, reporting the grid after each one.
    pub fn run<F>(&self, grid: &mut Grid, iterations: usize, mut on_iteration: F)
    where
        F: FnMut(usize, &Grid),
    {
        for iteration in 0..iterations {
            self.step(grid);
            trace!(
                "automaton iteration {} filled {} of {} cells",
                iteration + 1,
                grid.count(|cell| cell == Cell::Wall),
                grid.len()
            );
            on_iteration(iteration, grid);
        }
    }

    fn next_state(&self, grid: &Grid, cell: CellCoord) -> Cell {
        if occupied_neighbours(grid, cell, self.rule.radius) >= self.rule.threshold {
            Cell::Wall
        } else {
            Cell::Empty
        }
    }
}

/// Counts occupied cells in the square window of `radius` around `center`.
///
/// The centre is included and out-of-bounds positions count as occupied, so
/// the edge of the map behaves like solid rock.
#[must_use]
pub fn occupied_neighbours(grid: &Grid, center: CellCoord, radius: u32) -> u32 {
    let radius = i64::from(radius);
    let (columns, rows) = (i64::from(grid.columns()), i64::from(grid.rows()));
    let (column, row) = (i64::from(center.column()), i64::from(center.row()));

    let mut count = 0;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let (x, y) = (column + dx, row + dy);
            let occupied = if x < 0 || y < 0 || x >= columns || y >= rows {
                true
            } else {
                grid.get(CellCoord::new(x as u32, y as u32))
                    .is_some_and(Cell::is_occupied)
            };
            if occupied {
                count += 1;
            }
        }
    }
    count
}

/// Seeds the grid with independent per-cell noise.
///
/// Each cell becomes a wall with probability `density`, otherwise floor.
pub fn fill_noise<R: Rng>(grid: &mut Grid, density: f64, rng: &mut R) {
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let value = if rng.gen::<f64>() < density {
                Cell::Wall
            } else {
                Cell::Empty
            };
            grid.set(CellCoord::new(column, row), value);
        }
    }
}

/// Parameters of the cave demo: noise seeding followed by smoothing sweeps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Half-width of the square neighbourhood window.
    pub radius: u32,
    /// Minimum occupied count for a cell to become a wall.
    pub threshold: u32,
    /// Update strategy used for every sweep.
    pub mode: UpdateMode,
    /// Number of sweeps.
    pub iterations: usize,
    /// Share of cells seeded as walls before smoothing.
    pub noise_density: f64,
}

impl CaveConfig {
    /// Neighbourhood rule applied during each sweep.
    #[must_use]
    pub const fn rule(&self) -> AutomatonRule {
        AutomatonRule::new(self.radius, self.threshold)
    }

    /// Automaton configured with this rule and update strategy.
    #[must_use]
    pub const fn automaton(&self) -> CellularAutomaton {
        CellularAutomaton::new(self.rule(), self.mode)
    }

    /// Verifies that the noise density is a probability.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_probability("noise_density", self.noise_density)
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        let rule = AutomatonRule::default();
        Self {
            radius: rule.radius,
            threshold: rule.threshold,
            mode: UpdateMode::DoubleBuffered,
            iterations: 3,
            noise_density: 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_counts_outside_cells_as_occupied() {
        let grid = Grid::new(4, 4);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(0, 0), 1), 5);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(1, 0), 1), 3);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(1, 1), 1), 0);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(0, 0), 2), 16);
    }

    #[test]
    fn centre_cell_is_part_of_the_window() {
        let mut grid = Grid::new(3, 3);
        grid.set(CellCoord::new(1, 1), Cell::Wall);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(1, 1), 1), 1);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(1, 1), 0), 1);
    }

    #[test]
    fn agent_counts_as_occupied() {
        let mut grid = Grid::new(3, 3);
        grid.set(CellCoord::new(0, 1), Cell::Agent);
        assert_eq!(occupied_neighbours(&grid, CellCoord::new(1, 1), 1), 1);
    }
}
