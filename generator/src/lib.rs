#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generators that chain the individual passes into complete maps.
//!
//! Each map family has a config struct and a generator owning its random
//! number generator. Seeding the generator with the same value replays the
//! same maps.

mod bomberman;
mod dungeon;
mod search;

pub use bomberman::{BombermanConfig, BombermanGenerator, BombermanMap};
pub use dungeon::{CarvedDungeon, CaveMap, DungeonConfig, DungeonGenerator};
pub use search::{grid_search, SearchOutcome, SearchSpace};
