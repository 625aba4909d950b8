use std::collections::{HashSet, VecDeque};

use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilemap_pcg_core::{
    Cell, CellCoord, CellRect, CellRectSize, Direction, Grid, GridError, ParameterError,
};
use tilemap_pcg_system_drunk_agent::{
    stamp_room, walk, AdaptiveChance, DrunkAgent, DrunkAgentConfig,
};

fn carved(grid: &Grid) -> HashSet<CellCoord> {
    grid.iter()
        .filter(|(_, cell)| cell.is_occupied())
        .map(|(coord, _)| coord)
        .collect()
}

fn reachable_from(start: CellCoord, cells: &HashSet<CellCoord>, columns: u32, rows: u32) -> usize {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            if let Some(next) = direction.offset(cell, columns, rows) {
                if cells.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    seen.len()
}

#[test]
fn carved_cells_form_one_connected_region() {
    for seed in 0..32 {
        let mut grid = Grid::new(40, 25);
        let start = CellCoord::new(20, 12);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let summary = DrunkAgent::default()
            .run(&mut grid, start, &mut rng)
            .expect("start lies inside the grid");

        let cells = carved(&grid);
        assert!(cells.contains(&start), "seed {seed} left the start uncarved");
        assert_eq!(
            reachable_from(start, &cells, grid.columns(), grid.rows()),
            cells.len(),
            "seed {seed} produced disconnected cells"
        );
        assert!(cells.contains(&summary.final_position));
    }
}

#[test]
fn final_position_is_tagged_as_agent() {
    let mut grid = Grid::new(40, 25);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let summary = DrunkAgent::default()
        .run(&mut grid, CellCoord::new(5, 5), &mut rng)
        .expect("start lies inside the grid");

    assert_eq!(grid.get(summary.final_position), Some(Cell::Agent));
    assert_eq!(grid.count(|cell| cell == Cell::Agent), 1);
    for room in &summary.rooms {
        assert!(room.area() > 0);
        assert!(room.origin().column() + room.size().width() <= grid.columns());
        assert!(room.origin().row() + room.size().height() <= grid.rows());
    }
}

#[test]
fn start_outside_the_grid_is_rejected() {
    let mut grid = Grid::new(10, 10);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let result = DrunkAgent::default().run(&mut grid, CellCoord::new(10, 3), &mut rng);

    assert!(matches!(result, Err(GridError::OutOfBounds { .. })));
    assert_eq!(grid.count(Cell::is_occupied), 0);
}

#[test]
fn runs_replay_with_the_same_seed() {
    let agent = DrunkAgent::new(DrunkAgentConfig {
        walks: 20,
        ..DrunkAgentConfig::default()
    });
    let start = CellCoord::new(17, 9);

    let mut first = Grid::new(40, 25);
    let first_summary = agent
        .run(&mut first, start, &mut ChaCha8Rng::seed_from_u64(77))
        .expect("start lies inside the grid");
    let mut second = Grid::new(40, 25);
    let second_summary = agent
        .run(&mut second, start, &mut ChaCha8Rng::seed_from_u64(77))
        .expect("start lies inside the grid");

    assert_eq!(first, second);
    assert_eq!(first_summary, second_summary);
}

#[test]
fn walk_stops_at_the_boundary() {
    let mut grid = Grid::new(5, 5);

    let end = walk(&mut grid, CellCoord::new(3, 2), Direction::East, 10);

    assert_eq!(end, CellCoord::new(4, 2));
    assert_eq!(grid.count(|cell| cell == Cell::Wall), 2);
}

#[test]
fn walk_of_zero_steps_carves_nothing() {
    let mut grid = Grid::new(5, 5);

    let end = walk(&mut grid, CellCoord::new(2, 2), Direction::North, 0);

    assert_eq!(end, CellCoord::new(2, 2));
    assert_eq!(grid.count(Cell::is_occupied), 0);
}

#[test]
fn walk_carves_a_straight_corridor() {
    let mut grid = Grid::new(8, 8);

    let end = walk(&mut grid, CellCoord::new(1, 6), Direction::North, 4);

    assert_eq!(end, CellCoord::new(1, 2));
    for row in 2..=6 {
        assert_eq!(grid.get(CellCoord::new(1, row)), Some(Cell::Wall));
    }
    assert_eq!(grid.count(|cell| cell == Cell::Wall), 5);
}

#[test]
fn rooms_in_corners_are_clamped() {
    let size = CellRectSize::new(4, 5);
    let corners = [
        (CellCoord::new(0, 0), CellCoord::new(0, 0), CellRectSize::new(2, 3)),
        (CellCoord::new(39, 0), CellCoord::new(37, 0), CellRectSize::new(3, 3)),
        (CellCoord::new(0, 24), CellCoord::new(0, 22), CellRectSize::new(2, 3)),
        (CellCoord::new(39, 24), CellCoord::new(37, 22), CellRectSize::new(3, 3)),
    ];

    for (center, origin, clamped) in corners {
        let mut grid = Grid::new(40, 25);
        let room = stamp_room(&mut grid, center, size);

        assert_eq!(
            room,
            CellRect::from_origin_and_size(origin, clamped),
            "room at {center:?}"
        );
        assert_eq!(grid.count(|cell| cell == Cell::Wall) as u64, room.area());
        assert!(grid.iter().all(|(cell, value)| room.contains(cell) == (value == Cell::Wall)));
    }
}

#[test]
fn room_in_the_middle_keeps_its_full_size() {
    let mut grid = Grid::new(40, 25);
    let room = stamp_room(&mut grid, CellCoord::new(20, 12), CellRectSize::new(4, 5));

    assert_eq!(room.origin(), CellCoord::new(18, 10));
    assert_eq!(room.area(), 20);
    assert!(room.contains(CellCoord::new(20, 12)));
    assert_eq!(grid.count(|cell| cell == Cell::Wall), 20);
}

#[test]
fn adaptive_chance_resets_after_success() {
    // Always rolls 0.0, so every trial with a positive chance succeeds.
    let mut low = StepRng::new(0, 0);
    let mut chance = AdaptiveChance::new(0.3, 0.1);
    assert!(chance.trial(&mut low));
    assert_eq!(chance.current(), 0.3);
}

#[test]
fn adaptive_chance_grows_until_certain() {
    // Always rolls just below 1.0, so only a certain chance succeeds.
    let mut high = StepRng::new(u64::MAX, 0);
    let mut chance = AdaptiveChance::new(0.5, 0.25);

    assert!(!chance.trial(&mut high));
    assert_eq!(chance.current(), 0.75);
    assert!(!chance.trial(&mut high));
    assert_eq!(chance.current(), 1.0);
    assert!(chance.trial(&mut high));
    assert_eq!(chance.current(), 0.5);
}

#[test]
fn adaptive_chance_is_capped_at_one() {
    let mut high = StepRng::new(u64::MAX, 0);
    let mut chance = AdaptiveChance::new(0.9, 0.6);

    assert!(!chance.trial(&mut high));
    assert_eq!(chance.current(), 1.0);
}

#[test]
fn config_validation_rejects_bad_values() {
    assert!(DrunkAgentConfig::default().validate().is_ok());

    let config = DrunkAgentConfig {
        turn_chance: 1.5,
        ..DrunkAgentConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ParameterError::ProbabilityOutOfRange {
            name: "turn_chance",
            ..
        })
    ));

    let config = DrunkAgentConfig {
        room_rows: 0,
        ..DrunkAgentConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ParameterError::ZeroDimension { name: "room_rows" })
    ));
}
