//! Optional TOML configuration shared by every subcommand.

use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use log::info;
use serde::{Deserialize, Serialize};
use tilemap_pcg_generator::{BombermanConfig, DungeonConfig, SearchSpace};

/// File read from the working directory when no `--config` is given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "tilemap-pcg.toml";

/// Settings for all demos; missing sections keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Bomberman map used by the `bomberman` and `search` subcommands.
    pub(crate) bomberman: BombermanConfig,
    /// Density candidates explored by the `search` subcommand.
    pub(crate) search: SearchSpace,
    /// Drunk agent and cave settings used by the `dungeon` subcommand.
    pub(crate) dungeon: DungeonConfig,
}

impl AppConfig {
    /// Loads and validates the configuration.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// read when present and the defaults are used otherwise.
    pub(crate) fn load(path: Option<&Path>) -> AnyResult<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.is_file() {
                    Self::read(fallback)?
                } else {
                    info!("no configuration file found, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> AnyResult<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("failed to load configuration file {}", path.display()))?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses configuration TOML without validating it.
    pub(crate) fn parse(contents: &str) -> AnyResult<Self> {
        toml::from_str(contents).context("invalid configuration TOML")
    }

    /// Rejects probabilities outside `[0, 1]` and zero dimensions.
    pub(crate) fn validate(&self) -> AnyResult<()> {
        self.bomberman
            .validate()
            .context("invalid [bomberman] section")?;
        self.search.validate().context("invalid [search] section")?;
        self.dungeon.validate().context("invalid [dungeon] section")?;
        Ok(())
    }
}
