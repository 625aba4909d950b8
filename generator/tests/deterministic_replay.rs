use tilemap_pcg_core::{Cell, Densities};
use tilemap_pcg_generator::{
    BombermanConfig, BombermanGenerator, DungeonConfig, DungeonGenerator,
};

#[test]
fn bomberman_maps_replay_for_the_same_seed() {
    let config = BombermanConfig {
        clear_corners: true,
        ..BombermanConfig::default()
    };
    let mut first = BombermanGenerator::from_seed(config, 0x5eed);
    let mut second = BombermanGenerator::from_seed(config, 0x5eed);

    for _ in 0..4 {
        assert_eq!(
            first.generate_default(),
            second.generate_default(),
            "bomberman replay diverged"
        );
    }
}

#[test]
fn different_seeds_produce_different_bomberman_maps() {
    let config = BombermanConfig::default();
    let first = BombermanGenerator::from_seed(config, 1).generate_default();
    let second = BombermanGenerator::from_seed(config, 2).generate_default();

    assert_ne!(first.grid, second.grid);
    assert_eq!(first.placement.destructible_target, second.placement.destructible_target);
}

#[test]
fn classic_map_matches_its_report() {
    let mut generator = BombermanGenerator::from_seed(BombermanConfig::default(), 9);
    let map = generator.generate(Densities::new(0.4, 0.1, 0.05));

    let destructible = map
        .grid
        .count(|cell| matches!(cell, Cell::DestructibleWall | Cell::Exit) || cell.is_power_up());
    assert_eq!(destructible, map.placement.destructible_target);
    assert_eq!(map.grid.count(|cell| cell == Cell::Exit), 1);
    assert_eq!(map.grid.count(Cell::is_enemy), map.placement.enemies_placed);
    assert!(map.placement.exit.is_some());
}

#[test]
fn dungeon_runs_replay_for_the_same_seed() {
    let config = DungeonConfig::default();
    let mut first = DungeonGenerator::from_seed(config, 42);
    let mut second = DungeonGenerator::from_seed(config, 42);

    let carved = first.carve().expect("default dungeon has cells");
    assert_eq!(carved, second.carve().expect("default dungeon has cells"));
    assert_eq!(carved.grid.get(carved.summary.final_position), Some(Cell::Agent));

    let mut first_iterations = Vec::new();
    let first_cave = first.cave(|_, grid| first_iterations.push(grid.clone()));
    let mut second_iterations = Vec::new();
    let second_cave = second.cave(|_, grid| second_iterations.push(grid.clone()));

    assert_eq!(first_cave, second_cave);
    assert_eq!(first_iterations, second_iterations);
    assert_eq!(first_iterations.len(), config.automaton.iterations);
    assert_eq!(first_iterations.last(), Some(&first_cave.grid));
}

#[test]
fn carving_a_grid_without_cells_fails() {
    let config = DungeonConfig {
        columns: 0,
        ..DungeonConfig::default()
    };

    assert!(DungeonGenerator::from_seed(config, 0).carve().is_err());
}
