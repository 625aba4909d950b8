use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tilemap_pcg_core::{check_probability, Densities, ParameterError};
use tilemap_pcg_system_scoring::{score, Score};

use crate::{BombermanGenerator, BombermanMap};

const INITIAL_BEST: f64 = -1e9;

/// Candidate values explored for each density.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpace {
    /// Candidate destructible densities.
    pub destructible: Vec<f64>,
    /// Candidate power-up densities.
    pub power_up: Vec<f64>,
    /// Candidate enemy densities.
    pub enemy: Vec<f64>,
}

impl SearchSpace {
    /// Number of density triples in the Cartesian product.
    #[must_use]
    pub fn len(&self) -> usize {
        self.destructible.len() * self.power_up.len() * self.enemy.len()
    }

    /// Reports whether the product is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every triple, destructible outermost and enemy innermost.
    pub fn candidates(&self) -> impl Iterator<Item = Densities> + '_ {
        self.destructible.iter().flat_map(move |&destructible| {
            self.power_up.iter().flat_map(move |&power_up| {
                self.enemy
                    .iter()
                    .map(move |&enemy| Densities::new(destructible, power_up, enemy))
            })
        })
    }

    /// Verifies that every candidate is a probability.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for &value in &self.destructible {
            check_probability("destructible", value)?;
        }
        for &value in &self.power_up {
            check_probability("power_up", value)?;
        }
        for &value in &self.enemy {
            check_probability("enemy", value)?;
        }
        Ok(())
    }
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            destructible: vec![0.2, 0.25, 0.3, 0.35, 0.4],
            power_up: vec![0.1, 0.15, 0.2, 0.25, 0.3],
            enemy: vec![0.05, 0.55, 0.1, 0.15, 0.2],
        }
    }
}

/// Best map found by [`grid_search`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Densities the best map was generated with.
    pub densities: Densities,
    /// Score of the best map.
    pub score: Score,
    /// The best map.
    pub map: BombermanMap,
    /// Number of maps generated and scored.
    pub evaluated: usize,
}

/// Generates and scores one map per triple of the search space.
///
/// The first map scoring strictly higher than every earlier one wins, so ties
/// keep the earlier triple. Returns `None` when the space is empty.
pub fn grid_search<R: Rng>(
    generator: &mut BombermanGenerator<R>,
    space: &SearchSpace,
) -> Option<SearchOutcome> {
    let mut best_total = INITIAL_BEST;
    let mut best = None;
    let mut evaluated = 0;

    for densities in space.candidates() {
        let map = generator.generate(densities);
        let score = score(&map.grid);
        evaluated += 1;
        debug!("densities {:?} scored {}", densities, score.total);

        if score.total > best_total {
            best_total = score.total;
            best = Some((densities, score, map));
        }
    }

    best.map(|(densities, score, map)| SearchOutcome {
        densities,
        score,
        map,
        evaluated,
    })
}
