use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tilemap_pcg_core::{check_dimension, CellCoord, Grid, GridError, ParameterError};
use tilemap_pcg_system_automaton::{fill_noise, CaveConfig};
use tilemap_pcg_system_drunk_agent::{DrunkAgent, DrunkAgentConfig, WalkSummary};

/// Parameters of the dungeon demos.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Random walker settings.
    pub agent: DrunkAgentConfig,
    /// Noise and smoothing settings.
    pub automaton: CaveConfig,
}

impl DungeonConfig {
    /// Verifies the dimensions and both nested configurations.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_dimension("columns", self.columns)?;
        check_dimension("rows", self.rows)?;
        self.agent.validate()?;
        self.automaton.validate()
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            columns: 40,
            rows: 25,
            agent: DrunkAgentConfig::default(),
            automaton: CaveConfig::default(),
        }
    }
}

/// Grid carved by the random walker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarvedDungeon {
    /// Cell the walker started on.
    pub start: CellCoord,
    /// Carved cells; the walker's final position holds the agent.
    pub grid: Grid,
    /// Rooms and turns of the walk.
    pub summary: WalkSummary,
}

/// Noise seed and the grid it was smoothed into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaveMap {
    /// Grid right after noise seeding.
    pub noise: Grid,
    /// Grid after every smoothing sweep.
    pub grid: Grid,
}

/// Generates dungeon maps with the random walker or the cellular automaton.
#[derive(Clone, Debug)]
pub struct DungeonGenerator<R = ChaCha8Rng> {
    config: DungeonConfig,
    rng: R,
}

impl DungeonGenerator<ChaCha8Rng> {
    /// Creates a generator whose maps replay for the same seed.
    #[must_use]
    pub fn from_seed(config: DungeonConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy(config: DungeonConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> DungeonGenerator<R> {
    /// Creates a generator drawing from the provided random number generator.
    #[must_use]
    pub const fn with_rng(config: DungeonConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Runs the random walker from a uniformly chosen cell of an empty grid.
    ///
    /// Fails with [`GridError::Empty`] when the configured grid has no cells.
    pub fn carve(&mut self) -> Result<CarvedDungeon, GridError> {
        let mut grid = Grid::new(self.config.columns, self.config.rows);
        if grid.is_empty() {
            return Err(GridError::Empty);
        }

        let start = CellCoord::new(
            self.rng.gen_range(0..grid.columns()),
            self.rng.gen_range(0..grid.rows()),
        );
        let summary = DrunkAgent::new(self.config.agent).run(&mut grid, start, &mut self.rng)?;

        Ok(CarvedDungeon {
            start,
            grid,
            summary,
        })
    }

    /// Seeds noise and smooths it, reporting the grid after every sweep.
    pub fn cave<F>(&mut self, on_iteration: F) -> CaveMap
    where
        F: FnMut(usize, &Grid),
    {
        let cave = self.config.automaton;
        let mut grid = Grid::new(self.config.columns, self.config.rows);
        fill_noise(&mut grid, cave.noise_density, &mut self.rng);
        let noise = grid.clone();

        cave.automaton()
            .run(&mut grid, cave.iterations, on_iteration);

        CaveMap { noise, grid }
    }
}
