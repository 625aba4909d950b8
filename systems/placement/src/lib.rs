#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised placement system that fills a structured Bomberman map with content.
//!
//! Given the free cells left by the structural pass, the system selects
//! destructible walls (some hiding power-ups), hides a single exit under one
//! destructible wall and scatters enemies over the remaining floor. Targets are
//! derived from the configured [`Densities`]; when fewer cells are available
//! than requested the counts clamp silently.

use log::debug;
use rand::{
    seq::{IteratorRandom, SliceRandom},
    Rng,
};
use tilemap_pcg_core::{Cell, CellCoord, Densities, EnemyKind, Grid, PowerUpKind};
use tilemap_pcg_system_structure::is_structural;

/// Outcome of a single placement run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Number of free cells offered to the pass.
    pub free_cells: usize,
    /// Destructible cells requested, power-ups and exit included.
    pub destructible_target: usize,
    /// Power-ups requested among the destructible cells.
    pub power_up_target: usize,
    /// Enemies requested over the remaining floor.
    pub enemy_target: usize,
    /// Enemies actually placed; never above `enemy_target`.
    pub enemies_placed: usize,
    /// Cell holding the exit, if any destructible wall was available.
    pub exit: Option<CellCoord>,
    /// Interior corners that held content and were reset to floor.
    pub corners_cleared: usize,
}

/// Placement system configured with a density triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    densities: Densities,
    clear_corners: bool,
}

impl Placement {
    /// Creates a placement system using the provided densities.
    #[must_use]
    pub const fn new(densities: Densities) -> Self {
        Self {
            densities,
            clear_corners: false,
        }
    }

    /// Enables or disables resetting the four interior corners after placement.
    #[must_use]
    pub const fn with_clear_corners(mut self, clear_corners: bool) -> Self {
        self.clear_corners = clear_corners;
        self
    }

    /// Places destructible walls, power-ups, the exit and enemies onto `grid`.
    ///
    /// `free` lists the cells the pass may use; it is normally produced by the
    /// structural pass and never contains ring or lattice cells.
    pub fn apply<R: Rng>(
        &self,
        grid: &mut Grid,
        free: &[CellCoord],
        rng: &mut R,
    ) -> PlacementReport {
        let mut candidates = free.to_vec();
        let free_cells = candidates.len();
        let destructible_target = scaled_count(free_cells, self.densities.destructible);
        let power_up_target = scaled_count(destructible_target, self.densities.power_up);
        let enemy_target = scaled_count(free_cells - destructible_target, self.densities.enemy);

        let (chosen, rest) = candidates.partial_shuffle(rng, destructible_target);
        for (index, cell) in chosen.iter().enumerate() {
            let value = if index < power_up_target {
                Cell::PowerUp(random_power_up(rng))
            } else {
                Cell::DestructibleWall
            };
            grid.set(*cell, value);
        }

        let exit = choose_destructible(grid, chosen.iter().copied(), rng);
        if let Some(cell) = exit {
            grid.set(cell, Cell::Exit);
        }

        let floor: Vec<CellCoord> = rest
            .iter()
            .copied()
            .filter(|cell| grid.get(*cell) == Some(Cell::Empty))
            .collect();
        let enemies: Vec<CellCoord> = floor.choose_multiple(rng, enemy_target).copied().collect();
        for cell in &enemies {
            grid.set(*cell, Cell::Enemy(random_enemy(rng)));
        }

        let mut report = PlacementReport {
            free_cells,
            destructible_target,
            power_up_target,
            enemy_target,
            enemies_placed: enemies.len(),
            exit,
            corners_cleared: 0,
        };

        if self.clear_corners {
            clear_corners(grid, free, &mut report, rng);
        }

        debug!(
            "placed {} destructible ({} power-ups), {}/{} enemies over {} free cells, exit at {:?}",
            report.destructible_target,
            report.power_up_target,
            report.enemies_placed,
            report.enemy_target,
            report.free_cells,
            report.exit
        );

        report
    }
}

/// Returns the four interior corner cells of a grid, without duplicates.
///
/// Corners that fall on the ring or a lattice pillar of small or even-sized
/// grids are omitted.
#[must_use]
pub fn interior_corners(columns: u32, rows: u32) -> Vec<CellCoord> {
    if columns < 2 || rows < 2 {
        return Vec::new();
    }

    let mut corners = vec![
        CellCoord::new(1, 1),
        CellCoord::new(columns - 2, 1),
        CellCoord::new(1, rows - 2),
        CellCoord::new(columns - 2, rows - 2),
    ];
    corners.retain(|cell| !is_structural(*cell, columns, rows));
    corners.sort();
    corners.dedup();
    corners
}

/// Computes `floor(total * ratio)` clamped to `0..=total`.
#[must_use]
pub fn scaled_count(total: usize, ratio: f64) -> usize {
    let scaled = (total as f64 * ratio).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(total)
    }
}

fn clear_corners<R: Rng>(
    grid: &mut Grid,
    free: &[CellCoord],
    report: &mut PlacementReport,
    rng: &mut R,
) {
    let mut exit_cleared = false;
    for corner in interior_corners(grid.columns(), grid.rows()) {
        match grid.get(corner) {
            Some(Cell::Empty) | None => continue,
            Some(previous) => {
                if previous == Cell::Exit {
                    exit_cleared = true;
                }
                if previous.is_enemy() {
                    report.enemies_placed -= 1;
                }
                report.corners_cleared += 1;
                grid.set(corner, Cell::Empty);
            }
        }
    }

    if exit_cleared {
        report.exit = choose_destructible(grid, free.iter().copied(), rng);
        if let Some(cell) = report.exit {
            grid.set(cell, Cell::Exit);
        }
        debug!("corner clearing removed the exit, relocated to {:?}", report.exit);
    }
}

fn choose_destructible<I, R>(grid: &Grid, cells: I, rng: &mut R) -> Option<CellCoord>
where
    I: Iterator<Item = CellCoord>,
    R: Rng,
{
    cells
        .filter(|cell| grid.get(*cell) == Some(Cell::DestructibleWall))
        .choose(rng)
}

fn random_power_up<R: Rng>(rng: &mut R) -> PowerUpKind {
    PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())]
}

fn random_enemy<R: Rng>(rng: &mut R) -> EnemyKind {
    EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_count_truncates_and_clamps() {
        assert_eq!(scaled_count(133, 0.4), 53);
        assert_eq!(scaled_count(53, 0.1), 5);
        assert_eq!(scaled_count(10, 0.0), 0);
        assert_eq!(scaled_count(10, 1.0), 10);
        assert_eq!(scaled_count(10, 2.5), 10);
        assert_eq!(scaled_count(10, -0.5), 0);
        assert_eq!(scaled_count(10, f64::NAN), 0);
    }

    #[test]
    fn interior_corners_of_tiny_grids_collapse() {
        assert_eq!(interior_corners(3, 3), vec![CellCoord::new(1, 1)]);
        assert!(interior_corners(2, 2).is_empty());
        assert_eq!(interior_corners(15, 15).len(), 4);
        let even = interior_corners(4, 4);
        assert_eq!(even.len(), 3);
        assert!(!even.contains(&CellCoord::new(2, 2)));
    }
}
