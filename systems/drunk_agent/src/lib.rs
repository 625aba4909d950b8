#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! "Drunk agent" random walker that carves corridors and stamps rooms.
//!
//! The agent performs a fixed number of straight walks. After each walk it
//! rolls once for a room centred on its position and once for a new facing.
//! Each roll uses an [`AdaptiveChance`]: a failed roll makes the next one more
//! likely, a successful roll resets the chance to its base value.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tilemap_pcg_core::{
    check_dimension, check_probability, Cell, CellCoord, CellRect, CellRectSize, Direction, Grid,
    GridError, ParameterError,
};

/// Tuning knobs of the random walker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrunkAgentConfig {
    /// Number of straight walks performed.
    pub walks: u32,
    /// Maximum number of steps in a single walk.
    pub steps_per_walk: u32,
    /// Width of a stamped room in columns.
    pub room_columns: u32,
    /// Height of a stamped room in rows.
    pub room_rows: u32,
    /// Base chance of stamping a room after a walk.
    pub room_chance: f64,
    /// Amount added to the room chance after every walk without a room.
    pub room_chance_increment: f64,
    /// Base chance of picking a new facing after a walk.
    pub turn_chance: f64,
    /// Amount added to the turn chance after every walk without a turn.
    pub turn_chance_increment: f64,
}

impl DrunkAgentConfig {
    /// Dimensions of a stamped room.
    #[must_use]
    pub const fn room_size(&self) -> CellRectSize {
        CellRectSize::new(self.room_columns, self.room_rows)
    }

    /// Verifies that chances are probabilities and rooms have an area.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_dimension("room_columns", self.room_columns)?;
        check_dimension("room_rows", self.room_rows)?;
        check_probability("room_chance", self.room_chance)?;
        check_probability("room_chance_increment", self.room_chance_increment)?;
        check_probability("turn_chance", self.turn_chance)?;
        check_probability("turn_chance_increment", self.turn_chance_increment)
    }
}

impl Default for DrunkAgentConfig {
    fn default() -> Self {
        Self {
            walks: 8,
            steps_per_walk: 12,
            room_columns: 4,
            room_rows: 5,
            room_chance: 0.3,
            room_chance_increment: 0.1,
            turn_chance: 0.25,
            turn_chance_increment: 0.15,
        }
    }
}

/// Probability that grows after every failed trial and resets after a success.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptiveChance {
    base: f64,
    increment: f64,
    current: f64,
}

impl AdaptiveChance {
    /// Creates a chance starting at `base`.
    #[must_use]
    pub const fn new(base: f64, increment: f64) -> Self {
        Self {
            base,
            increment,
            current: base,
        }
    }

    /// Probability used by the next trial.
    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    /// Rolls once against the current probability.
    ///
    /// Success resets the probability to its base value; failure raises it
    /// by the increment, capped at one.
    pub fn trial<R: Rng>(&mut self, rng: &mut R) -> bool {
        let success = rng.gen::<f64>() < self.current;
        self.current = if success {
            self.base
        } else {
            (self.current + self.increment).min(1.0)
        };
        success
    }
}

/// Result of a complete agent run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkSummary {
    /// Cell the agent ended on, tagged [`Cell::Agent`] in the grid.
    pub final_position: CellCoord,
    /// Rooms stamped during the run, clamped to the grid.
    pub rooms: Vec<CellRect>,
    /// Number of successful turn trials.
    pub turns: u32,
}

/// Random walker configured with a [`DrunkAgentConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrunkAgent {
    config: DrunkAgentConfig,
}

impl DrunkAgent {
    /// Creates a new walker.
    #[must_use]
    pub const fn new(config: DrunkAgentConfig) -> Self {
        Self { config }
    }

    /// Runs every walk starting from `start` and tags the final position.
    ///
    /// Fails when `start` lies outside the grid.
    pub fn run<R: Rng>(
        &self,
        grid: &mut Grid,
        start: CellCoord,
        rng: &mut R,
    ) -> Result<WalkSummary, GridError> {
        grid.ensure_contains(start)?;

        let config = &self.config;
        let mut room_chance = AdaptiveChance::new(config.room_chance, config.room_chance_increment);
        let mut turn_chance = AdaptiveChance::new(config.turn_chance, config.turn_chance_increment);
        let mut facing = random_direction(rng);
        let mut position = start;
        let mut rooms = Vec::new();
        let mut turns = 0;

        for index in 0..config.walks {
            debug!(
                "walk {}/{} from {:?} facing {:?}",
                index + 1,
                config.walks,
                position,
                facing
            );
            position = walk(grid, position, facing, config.steps_per_walk);

            if room_chance.trial(rng) {
                let room = stamp_room(grid, position, config.room_size());
                debug!("room stamped at {:?}", room);
                rooms.push(room);
            } else {
                debug!("no room, chance raised to {:.2}", room_chance.current());
            }

            if turn_chance.trial(rng) {
                let previous = facing;
                facing = random_direction(rng);
                turns += 1;
                debug!("facing changed from {:?} to {:?}", previous, facing);
            } else {
                debug!("facing kept, chance raised to {:.2}", turn_chance.current());
            }
        }

        grid.set(position, Cell::Agent);
        Ok(WalkSummary {
            final_position: position,
            rooms,
            turns,
        })
    }
}

/// Walks up to `steps` cells in a straight line, carving every visited cell.
///
/// The walk stops early when the next step would leave the grid. Returns the
/// cell the walker ends on. A walk of zero steps carves nothing.
pub fn walk(grid: &mut Grid, start: CellCoord, facing: Direction, steps: u32) -> CellCoord {
    let (columns, rows) = (grid.columns(), grid.rows());
    let mut position = start;
    for step in 0..steps {
        grid.set(position, Cell::Wall);
        let Some(next) = facing.offset(position, columns, rows) else {
            debug!("boundary reached after {} of {} steps", step + 1, steps);
            break;
        };
        position = next;
        grid.set(position, Cell::Wall);
    }
    position
}

/// Fills a room of `size` centred on `center`, clamped to the grid.
///
/// Returns the rectangle that was actually filled.
pub fn stamp_room(grid: &mut Grid, center: CellCoord, size: CellRectSize) -> CellRect {
    let (first_column, end_column) = clamp_span(center.column(), size.width(), grid.columns());
    let (first_row, end_row) = clamp_span(center.row(), size.height(), grid.rows());

    for row in first_row..end_row {
        for column in first_column..end_column {
            grid.set(CellCoord::new(column, row), Cell::Wall);
        }
    }

    CellRect::from_origin_and_size(
        CellCoord::new(first_column, first_row),
        CellRectSize::new(end_column - first_column, end_row - first_row),
    )
}

/// Span of `length` cells centred on `center`, clamped to `0..limit`.
fn clamp_span(center: u32, length: u32, limit: u32) -> (u32, u32) {
    let start = i64::from(center) - i64::from(length / 2);
    let end = start + i64::from(length);
    let first = start.clamp(0, i64::from(limit)) as u32;
    let last = end.clamp(0, i64::from(limit)) as u32;
    (first, last.max(first))
}

fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
