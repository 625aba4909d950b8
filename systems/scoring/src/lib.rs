#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Heuristic scoring of finished Bomberman maps.
//!
//! The score rewards destructible walls and a moderate number of power-ups,
//! slightly rewards open floor and penalises enemies. It exists to rank maps
//! during a brute-force parameter search.

use tilemap_pcg_core::{Cell, Grid};

const EMPTY_WEIGHT: f64 = 0.5;
const ENEMY_WEIGHT: f64 = -1.5;
const DESTRUCTIBLE_WEIGHT: f64 = 3.0;

/// Power-up count from which the generous bonus applies.
pub const POWER_UP_BONUS_FLOOR: usize = 4;
/// Largest power-up count that still earns the generous bonus.
pub const POWER_UP_BONUS_CEILING: usize = 8;

/// Cell counts the score is computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    /// Cells holding open floor.
    pub empty: usize,
    /// Cells holding an enemy.
    pub enemies: usize,
    /// Cells holding a power-up.
    pub power_ups: usize,
    /// Plain destructible walls; the exit and power-ups are not included.
    pub destructibles: usize,
}

impl Census {
    /// Counts the scored cell categories of a grid.
    #[must_use]
    pub fn of(grid: &Grid) -> Self {
        grid.cells()
            .iter()
            .fold(Self::default(), |mut census, cell| {
                match cell {
                    Cell::Empty => census.empty += 1,
                    Cell::Enemy(_) => census.enemies += 1,
                    Cell::PowerUp(_) => census.power_ups += 1,
                    Cell::DestructibleWall => census.destructibles += 1,
                    Cell::Wall | Cell::Exit | Cell::Agent => {}
                }
                census
            })
    }
}

/// Score of a map together with the counts it was derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    /// Counts the total was computed from.
    pub census: Census,
    /// Final heuristic value; larger is better.
    pub total: f64,
}

impl Score {
    /// Scores a census.
    #[must_use]
    pub fn from_census(census: Census) -> Self {
        let total = EMPTY_WEIGHT * census.empty as f64
            + ENEMY_WEIGHT * census.enemies as f64
            + power_up_bonus(census.power_ups)
            + DESTRUCTIBLE_WEIGHT * census.destructibles as f64;
        Self { census, total }
    }
}

/// Computes the score of a finished map.
#[must_use]
pub fn score(grid: &Grid) -> Score {
    Score::from_census(Census::of(grid))
}

/// Bonus awarded for the number of power-ups on a map.
///
/// Below four power-ups nothing is awarded, four to eight earn 1.5 per
/// power-up and anything above eight only 0.5 per power-up. The drop between
/// eight and nine is kept as is.
#[must_use]
pub fn power_up_bonus(count: usize) -> f64 {
    if count > POWER_UP_BONUS_CEILING {
        0.5 * count as f64
    } else if count >= POWER_UP_BONUS_FLOOR {
        1.5 * count as f64
    } else {
        0.0
    }
}
