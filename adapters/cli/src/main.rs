#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the tile map generators and prints their maps.

mod config;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result as AnyResult};
use clap::{Parser, Subcommand};
use log::info;
use tilemap_pcg_core::{Cell, Grid};
use tilemap_pcg_generator::{
    grid_search, BombermanConfig, BombermanGenerator, DungeonConfig, DungeonGenerator, SearchSpace,
};
use tilemap_pcg_rendering::GridRenderer;
use tilemap_pcg_system_automaton::UpdateMode;

use crate::config::AppConfig;

/// Procedural tile map generators.
#[derive(Debug, Parser)]
#[command(name = "tilemap-pcg", version, about, long_about = None)]
struct Cli {
    /// Seed for reproducible maps; drawn from OS entropy when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Configuration file; tilemap-pcg.toml is used when present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a single Bomberman map.
    Bomberman {
        /// Reset the four interior corners to floor.
        #[arg(long)]
        clear_corners: bool,
    },
    /// Search density triples for the best scoring Bomberman map.
    Search,
    /// Run the drunk agent and cellular automaton demos.
    Dungeon {
        /// Apply automaton updates in place instead of double buffering.
        #[arg(long)]
        in_place: bool,

        /// Number of automaton sweeps.
        #[arg(long, value_name = "N")]
        iterations: Option<usize>,
    },
}

fn main() -> AnyResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    match cli.seed {
        Some(seed) => info!("using seed {seed}"),
        None => info!("seeding from entropy"),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Bomberman { clear_corners } => {
            config.bomberman.clear_corners |= clear_corners;
            run_bomberman(config.bomberman, cli.seed, &mut out)
        }
        Command::Search => run_search(config.bomberman, &config.search, cli.seed, &mut out),
        Command::Dungeon {
            in_place,
            iterations,
        } => {
            if in_place {
                config.dungeon.automaton.mode = UpdateMode::InPlace;
            }
            if let Some(iterations) = iterations {
                config.dungeon.automaton.iterations = iterations;
            }
            run_dungeon(config.dungeon, cli.seed, &mut out)
        }
    }
}

fn bomberman_generator(config: BombermanConfig, seed: Option<u64>) -> BombermanGenerator {
    match seed {
        Some(seed) => BombermanGenerator::from_seed(config, seed),
        None => BombermanGenerator::from_entropy(config),
    }
}

fn run_bomberman<W: Write>(
    config: BombermanConfig,
    seed: Option<u64>,
    out: &mut W,
) -> AnyResult<()> {
    let mut generator = bomberman_generator(config, seed);

    let started = Instant::now();
    let map = generator.generate_default();
    let elapsed = started.elapsed();

    GridRenderer::bomberman(3).write(&map.grid, out)?;
    let densities = config.densities;
    writeln!(out)?;
    writeln!(out, "Generation time: {} µs", elapsed.as_micros())?;
    writeln!(
        out,
        "Parameters: destructible {}, power-ups {}, enemies {}",
        densities.destructible, densities.power_up, densities.enemy
    )?;
    Ok(())
}

fn run_search<W: Write>(
    config: BombermanConfig,
    space: &SearchSpace,
    seed: Option<u64>,
    out: &mut W,
) -> AnyResult<()> {
    let mut generator = bomberman_generator(config, seed);
    let outcome = grid_search(&mut generator, space).context("search space has no candidates")?;
    info!("scored {} maps", outcome.evaluated);

    let best = outcome.densities;
    writeln!(out, "Best parameters found:")?;
    writeln!(out, "Destructible walls:    {}", best.destructible)?;
    writeln!(out, "Power-ups:             {}", best.power_up)?;
    writeln!(out, "Enemies:               {}", best.enemy)?;
    writeln!(out, "Score:                 {}", outcome.score.total)?;
    writeln!(out)?;
    GridRenderer::bomberman(4).write(&outcome.map.grid, out)
}

fn run_dungeon<W: Write>(config: DungeonConfig, seed: Option<u64>, out: &mut W) -> AnyResult<()> {
    let mut generator = match seed {
        Some(seed) => DungeonGenerator::from_seed(config, seed),
        None => DungeonGenerator::from_entropy(config),
    };
    let renderer = GridRenderer::dungeon();

    writeln!(out, "=== DRUNK AGENT ===")?;
    let carved = generator.carve().context("failed to run the drunk agent")?;
    let total = carved.grid.len();
    let mut initial = Grid::new(config.columns, config.rows);
    initial.set(carved.start, Cell::Agent);
    writeln!(
        out,
        "Initial position: ({}, {})",
        carved.start.column(),
        carved.start.row()
    )?;
    renderer.write(&initial, out)?;

    let agent = config.agent;
    writeln!(
        out,
        "Walks: {}, steps per walk: {}, room size: {}x{}",
        agent.walks, agent.steps_per_walk, agent.room_columns, agent.room_rows
    )?;
    writeln!(out, "Final map after drunk agent:")?;
    renderer.write(&carved.grid, out)?;
    writeln!(
        out,
        "Rooms: {}, turns: {}",
        carved.summary.rooms.len(),
        carved.summary.turns
    )?;
    writeln!(
        out,
        "Filled cells: {}/{}",
        carved.grid.count(Cell::is_occupied),
        total
    )?;

    let automaton = config.automaton;
    writeln!(out)?;
    writeln!(out, "=== CELLULAR AUTOMATON ===")?;
    let mut sweeps = Vec::with_capacity(automaton.iterations);
    let cave = generator.cave(|_, grid| sweeps.push(grid.clone()));

    writeln!(out, "Initial random map (density {}):", automaton.noise_density)?;
    renderer.write(&cave.noise, out)?;
    for (index, grid) in sweeps.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "--- Cellular Automaton Iteration {}/{} ---",
            index + 1,
            automaton.iterations
        )?;
        renderer.write(grid, out)?;
        writeln!(
            out,
            "Filled cells after iteration {}: {}/{}",
            index + 1,
            grid.count(|cell| cell == Cell::Wall),
            total
        )?;
    }
    Ok(())
}
