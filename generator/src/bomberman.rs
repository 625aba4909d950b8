use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tilemap_pcg_core::{check_dimension, Densities, Grid, ParameterError};
use tilemap_pcg_system_placement::{Placement, PlacementReport};
use tilemap_pcg_system_structure::{free_cells, stamp, CLASSIC_SIZE};

/// Parameters of a Bomberman map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombermanConfig {
    /// Number of columns, border included.
    pub columns: u32,
    /// Number of rows, border included.
    pub rows: u32,
    /// Densities used by [`BombermanGenerator::generate_default`].
    pub densities: Densities,
    /// Resets the four interior corners to floor after placement.
    pub clear_corners: bool,
}

impl BombermanConfig {
    /// Verifies the dimensions and densities.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_dimension("columns", self.columns)?;
        check_dimension("rows", self.rows)?;
        self.densities.validate()
    }
}

impl Default for BombermanConfig {
    fn default() -> Self {
        Self {
            columns: CLASSIC_SIZE,
            rows: CLASSIC_SIZE,
            densities: Densities::default(),
            clear_corners: false,
        }
    }
}

/// Finished Bomberman map together with the placement report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BombermanMap {
    /// Generated cells.
    pub grid: Grid,
    /// Counts produced by the placement pass.
    pub placement: PlacementReport,
}

/// Generates Bomberman maps: structural pass followed by placement.
#[derive(Clone, Debug)]
pub struct BombermanGenerator<R = ChaCha8Rng> {
    config: BombermanConfig,
    rng: R,
}

impl BombermanGenerator<ChaCha8Rng> {
    /// Creates a generator whose maps replay for the same seed.
    #[must_use]
    pub fn from_seed(config: BombermanConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy(config: BombermanConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> BombermanGenerator<R> {
    /// Creates a generator drawing from the provided random number generator.
    #[must_use]
    pub const fn with_rng(config: BombermanConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Generates a map with the configured densities.
    pub fn generate_default(&mut self) -> BombermanMap {
        self.generate(self.config.densities)
    }

    /// Generates a map with the provided densities.
    pub fn generate(&mut self, densities: Densities) -> BombermanMap {
        let mut grid = Grid::new(self.config.columns, self.config.rows);
        stamp(&mut grid);
        let free = free_cells(&grid);

        let placement = Placement::new(densities)
            .with_clear_corners(self.config.clear_corners)
            .apply(&mut grid, &free, &mut self.rng);
        debug!(
            "bomberman map {}x{} with densities {:?}: {:?}",
            self.config.columns, self.config.rows, densities, placement
        );

        BombermanMap { grid, placement }
    }
}
