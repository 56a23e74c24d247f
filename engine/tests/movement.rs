mod support;

use std::time::Duration;

use gate_explorer_core::{
    CollectibleId, Command, Direction, Event, MoveRejection, Position, TileGrid, TileKind,
    WorldSize,
};
use gate_explorer_engine::{
    apply, query, Config, Engine, DISCOVERY_RADIUS, ENEMY_PENALTY, HAZARD_PENALTY, MAX_SUPPLIES,
};
use support::{engine_for, home_state, home_world_mut, stamp, step, GATE};

#[test]
fn hazard_costs_the_move_plus_the_penalty() {
    let mut state = home_state();
    let east = GATE.step(Direction::East);
    stamp(&mut home_world_mut(&mut state).grid, east, TileKind::Hazard, None);
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::East);

    assert_eq!(query::player(&engine).supplies, MAX_SUPPLIES - 6);
    assert!(events.contains(&Event::HazardStruck {
        position: east,
        penalty: HAZARD_PENALTY,
    }));
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(east), Some(TileKind::Hazard), "hazards persist");
}

#[test]
fn enemies_cost_more_than_hazards_and_stay_put() {
    let mut state = home_state();
    let west = GATE.step(Direction::West);
    stamp(&mut home_world_mut(&mut state).grid, west, TileKind::Enemy, None);
    let mut engine = engine_for(state);

    let _ = step(&mut engine, Direction::West);
    let _ = step(&mut engine, Direction::East);
    let _ = step(&mut engine, Direction::West);

    assert_eq!(
        query::player(&engine).supplies,
        MAX_SUPPLIES - 3 - 2 * ENEMY_PENALTY
    );
}

#[test]
fn running_dry_on_open_ground_ends_the_mission() {
    let mut state = home_state();
    state.player.supplies = 1;
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::South);

    let state = query::state(&engine);
    assert_eq!(state.player.supplies, 0);
    assert!(state.game_over);
    assert!(!state.victory);
    assert_eq!(events.last(), Some(&Event::SuppliesExhausted));
}

#[test]
fn penalties_floor_supplies_at_zero() {
    let mut state = home_state();
    state.player.supplies = 4;
    let north = GATE.step(Direction::North);
    stamp(&mut home_world_mut(&mut state).grid, north, TileKind::Enemy, None);
    let mut engine = engine_for(state);

    let _ = step(&mut engine, Direction::North);

    assert_eq!(query::player(&engine).supplies, 0);
    assert!(query::state(&engine).game_over);
}

#[test]
fn finished_sessions_ignore_moves() {
    let mut state = home_state();
    state.game_over = true;
    let before = state.clone();
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::South);

    assert_eq!(query::state(&engine), &before);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::South,
            reason: MoveRejection::SessionOver,
        }]
    );
}

#[test]
fn walls_block_without_changing_state() {
    let mut state = home_state();
    let north = GATE.step(Direction::North);
    stamp(&mut home_world_mut(&mut state).grid, north, TileKind::Wall, None);
    let before = state.clone();
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::North);

    assert_eq!(query::state(&engine), &before);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::North,
            reason: MoveRejection::Blocked,
        }]
    );
}

#[test]
fn leaving_the_grid_is_rejected() {
    let mut state = home_state();
    let open = TileGrid::filled(WorldSize::new(3, 3), false);
    let home = home_world_mut(&mut state);
    home.grid = open;
    home.gate_position = Position::new(0, 0);
    home.player_position = Position::new(0, 0);
    state.player.position = Position::new(0, 0);
    let before = state.clone();
    let mut engine = engine_for(state);

    for direction in [Direction::North, Direction::West] {
        let events = step(&mut engine, direction);
        assert_eq!(
            events,
            vec![Event::MoveRejected {
                direction,
                reason: MoveRejection::OutOfBounds,
            }]
        );
    }
    assert_eq!(query::state(&engine), &before);
}

#[test]
fn missing_active_world_rejects_moves() {
    let mut state = home_state();
    state.current_world = None;
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::East);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::East,
            reason: MoveRejection::NoActiveWorld,
        }]
    );
}

#[test]
fn artifacts_are_collected_exactly_once() {
    let mut state = home_state();
    let east = GATE.step(Direction::East);
    stamp(
        &mut home_world_mut(&mut state).grid,
        east,
        TileKind::Artifact,
        Some("artifact-earth-0"),
    );
    let mut engine = engine_for(state);

    let first = step(&mut engine, Direction::East);
    let _ = step(&mut engine, Direction::West);
    let second = step(&mut engine, Direction::East);

    let artifact = CollectibleId::new("artifact-earth-0");
    assert!(first.contains(&Event::ArtifactCollected {
        position: east,
        artifact: artifact.clone(),
    }));
    assert!(!second
        .iter()
        .any(|event| matches!(event, Event::ArtifactCollected { .. })));
    assert_eq!(query::player(&engine).artifacts, vec![artifact]);
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(east), Some(TileKind::Empty));
}

#[test]
fn duplicate_artifacts_are_cleared_without_a_second_pickup() {
    let mut state = home_state();
    let artifact = CollectibleId::new("artifact-earth-0");
    state.player.artifacts.push(artifact.clone());
    let east = GATE.step(Direction::East);
    stamp(
        &mut home_world_mut(&mut state).grid,
        east,
        TileKind::Artifact,
        Some("artifact-earth-0"),
    );
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::East);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ArtifactCollected { .. })));
    assert_eq!(query::player(&engine).artifacts, vec![artifact]);
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(east), Some(TileKind::Empty));
}

#[test]
fn anonymous_artifact_tiles_are_left_in_place() {
    let mut state = home_state();
    let north = GATE.step(Direction::North);
    stamp(&mut home_world_mut(&mut state).grid, north, TileKind::Artifact, None);
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::North);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ArtifactCollected { .. })));
    assert!(query::player(&engine).artifacts.is_empty());
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(north), Some(TileKind::Artifact));
}

#[test]
fn supplies_restore_up_to_capacity() {
    let mut state = home_state();
    state.player.supplies = 45;
    let south = GATE.step(Direction::South);
    stamp(
        &mut home_world_mut(&mut state).grid,
        south,
        TileKind::Supplies,
        Some("supplies-earth-0"),
    );
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::South);

    assert_eq!(query::player(&engine).supplies, MAX_SUPPLIES);
    assert!(events.contains(&Event::SuppliesCollected {
        position: south,
        amount: 6,
    }));
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(south), Some(TileKind::Empty));
}

#[test]
fn supplies_restore_at_most_ten() {
    let mut state = home_state();
    state.player.supplies = 20;
    let south = GATE.step(Direction::South);
    stamp(
        &mut home_world_mut(&mut state).grid,
        south,
        TileKind::Supplies,
        Some("supplies-earth-0"),
    );
    let mut engine = engine_for(state);

    let _ = step(&mut engine, Direction::South);

    assert_eq!(query::player(&engine).supplies, 29);
}

#[test]
fn anonymous_supply_tiles_are_left_alone() {
    let mut state = home_state();
    state.player.supplies = 30;
    let south = GATE.step(Direction::South);
    stamp(&mut home_world_mut(&mut state).grid, south, TileKind::Supplies, None);
    let mut engine = engine_for(state);

    let _ = step(&mut engine, Direction::South);

    assert_eq!(query::player(&engine).supplies, 29);
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(south), Some(TileKind::Supplies));
}

#[test]
fn power_cell_sets_the_flag_and_disappears() {
    let mut state = home_state();
    let east = GATE.step(Direction::East);
    stamp(
        &mut home_world_mut(&mut state).grid,
        east,
        TileKind::PowerCell,
        Some("power-cell-earth"),
    );
    let mut engine = engine_for(state);

    let events = step(&mut engine, Direction::East);

    assert!(query::player(&engine).has_power_cell);
    assert!(events.contains(&Event::PowerCellCollected { position: east }));
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(world.grid.kind_at(east), Some(TileKind::Empty));
}

#[test]
fn stepping_back_onto_the_gate_is_announced() {
    let mut engine = engine_for(home_state());
    let _ = step(&mut engine, Direction::East);
    let events = step(&mut engine, Direction::West);

    assert!(events.contains(&Event::GateReached { position: GATE }));
}

#[test]
fn moving_reveals_the_neighbourhood_and_tracks_position() {
    let mut engine = engine_for(home_state());
    let _ = step(&mut engine, Direction::East);
    let _ = step(&mut engine, Direction::East);

    let target = Position::new(6, 2);
    let world = query::active_world(&engine).expect("active world");
    assert_eq!(query::player(&engine).position, target);
    assert_eq!(world.player_position, target);
    for tile in world.grid.iter() {
        if tile.position.manhattan_distance(target) <= DISCOVERY_RADIUS {
            assert!(tile.discovered, "tile {} should be revealed", tile.position);
        }
    }
}

#[test]
fn discovered_tiles_never_revert() {
    let mut engine = engine_for(home_state());
    let _ = step(&mut engine, Direction::East);
    let revealed: Vec<Position> = query::active_world(&engine)
        .expect("active world")
        .grid
        .iter()
        .filter(|tile| tile.discovered)
        .map(|tile| tile.position)
        .collect();

    let _ = step(&mut engine, Direction::West);
    let _ = step(&mut engine, Direction::West);

    let world = query::active_world(&engine).expect("active world");
    for position in revealed {
        assert!(world.tile(position).is_some_and(|tile| tile.discovered));
    }
}

#[test]
fn rapid_moves_are_debounced() {
    let state = home_state();
    let mut engine = Engine::from_state(state, Config::new(Duration::from_millis(150), Some(1)));
    let mut at = |millis: u64, direction: Direction| {
        let mut events = Vec::new();
        apply(
            &mut engine,
            Command::Move {
                direction,
                issued_at: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    };

    assert!(matches!(at(0, Direction::East)[0], Event::PlayerMoved { .. }));
    assert_eq!(
        at(100, Direction::East),
        vec![Event::MoveRejected {
            direction: Direction::East,
            reason: MoveRejection::Debounced,
        }]
    );
    assert!(matches!(at(160, Direction::East)[0], Event::PlayerMoved { .. }));
    assert!(matches!(
        at(200, Direction::West)[0],
        Event::MoveRejected {
            reason: MoveRejection::Debounced,
            ..
        }
    ));
    assert!(matches!(at(320, Direction::West)[0], Event::PlayerMoved { .. }));
    assert_eq!(query::player(&engine).supplies, MAX_SUPPLIES - 3);
}

#[test]
fn rejected_moves_do_not_restart_the_cooldown() {
    let mut state = home_state();
    let north = GATE.step(Direction::North);
    stamp(&mut home_world_mut(&mut state).grid, north, TileKind::Wall, None);
    let mut engine = Engine::from_state(state, Config::new(Duration::from_millis(150), Some(1)));
    let mut events = Vec::new();

    for (millis, direction) in [(0, Direction::North), (10, Direction::East)] {
        apply(
            &mut engine,
            Command::Move {
                direction,
                issued_at: Duration::from_millis(millis),
            },
            &mut events,
        );
    }

    assert!(matches!(events[1], Event::PlayerMoved { .. }));
}

#[test]
fn supplies_stay_within_bounds_on_generated_worlds() {
    let mut engine = Engine::new(Config::new(Duration::ZERO, Some(2024)));
    let directions = Direction::ALL;

    for index in 0..400usize {
        let direction = directions[(index * 7 + index / 3) % directions.len()];
        let _ = step(&mut engine, direction);
        let player = query::player(&engine);
        assert!(player.supplies <= player.max_supplies);
        if query::state(&engine).game_over {
            break;
        }
    }
}
