use std::collections::HashSet;

use gate_explorer_core::{Biome, Position, TileKind, World, WorldId};
use gate_explorer_system_generation::{
    generate_world, FeatureCounts, CENTER_CLEARANCE, GRID_SIZE, HOME_MIN_FRAGMENTS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn generate(biome: Biome, level: u32, seed: u64) -> World {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_world(WorldId::new("sample"), "Sample", biome, level, &mut rng)
}

fn positions_of(world: &World, kind: TileKind) -> Vec<Position> {
    world
        .grid
        .iter()
        .filter(|tile| tile.kind == kind)
        .map(|tile| tile.position)
        .collect()
}

#[test]
fn border_is_entirely_wall() {
    for seed in 0..8 {
        let world = generate(Biome::Jungle, 3, seed);
        for tile in world.grid.iter() {
            if GRID_SIZE.is_border(tile.position) {
                assert_eq!(tile.kind, TileKind::Wall, "border tile {}", tile.position);
            }
        }
    }
}

#[test]
fn single_gate_sits_on_the_player_start() {
    for seed in 0..8 {
        let world = generate(Biome::Arctic, 4, seed);
        let gates = positions_of(&world, TileKind::Gate);

        assert_eq!(gates, vec![GRID_SIZE.center()]);
        assert_eq!(world.gate_position, GRID_SIZE.center());
        assert_eq!(world.player_position, world.gate_position);
        assert!(!world.discovered);
        assert_eq!(world.size(), GRID_SIZE);
    }
}

#[test]
fn obstacles_keep_clear_of_the_centre() {
    for seed in 0..16 {
        let world = generate(Biome::Volcanic, 2, seed);
        let center = world.gate_position;
        for tile in world.grid.iter() {
            if tile.kind == TileKind::Wall && !GRID_SIZE.is_border(tile.position) {
                assert!(
                    tile.position.manhattan_distance(center) >= CENTER_CLEARANCE,
                    "obstacle at {} too close to centre",
                    tile.position
                );
            }
        }
    }
}

#[test]
fn uncrowded_worlds_receive_their_full_budget() {
    for level in 1..=5 {
        let counts = FeatureCounts::for_level(Biome::Desert, level);
        let world = generate(Biome::Desert, level, u64::from(level));

        assert_eq!(world.grid.count(TileKind::Ruins), counts.ruins as usize);
        assert_eq!(world.grid.count(TileKind::Supplies), counts.supplies as usize);
        assert_eq!(
            world.grid.count(TileKind::GateFragment),
            counts.fragments as usize
        );
        assert_eq!(world.grid.count(TileKind::Hazard), counts.hazards as usize);
        assert_eq!(world.grid.count(TileKind::Enemy), counts.enemies as usize);
        assert!(world.grid.count(TileKind::Artifact) <= counts.ruins as usize);
        assert_eq!(world.grid.count(TileKind::PowerCell), 0);
    }
}

#[test]
fn artifacts_sit_next_to_ruins() {
    let world = generate(Biome::Jungle, 5, 8);
    let ruins = positions_of(&world, TileKind::Ruins);
    let artifacts = positions_of(&world, TileKind::Artifact);

    assert!(!artifacts.is_empty());
    for artifact in artifacts {
        assert!(
            ruins.iter().any(|ruin| {
                (ruin.x() - artifact.x()).abs() <= 1 && (ruin.y() - artifact.y()).abs() <= 1
            }),
            "artifact at {artifact} has no neighbouring ruin"
        );
    }
}

#[test]
fn home_world_always_keeps_its_power_cell_and_fragments() {
    for seed in 0..500 {
        let world = generate(Biome::Earth, 1, seed);

        assert_eq!(world.grid.count(TileKind::PowerCell), 1, "seed {seed}");
        assert_eq!(
            world.grid.count(TileKind::GateFragment),
            HOME_MIN_FRAGMENTS as usize,
            "seed {seed}"
        );
        assert_eq!(world.grid.kind_at(world.gate_position), Some(TileKind::Gate));
    }
}

#[test]
fn power_cell_only_spawns_on_the_home_world() {
    let home = generate(Biome::Earth, 1, 42);
    assert_eq!(home.grid.count(TileKind::PowerCell), 1);

    for biome in [Biome::Jungle, Biome::Desert, Biome::AlienCity] {
        assert_eq!(generate(biome, 2, 42).grid.count(TileKind::PowerCell), 0);
    }
}

#[test]
fn collectibles_carry_unique_identifiers() {
    let world = generate(Biome::Earth, 1, 9);
    let mut seen = HashSet::new();

    for tile in world.grid.iter() {
        if tile.kind.is_collectible() {
            let id = tile.id.clone().expect("collectible without identifier");
            assert!(seen.insert(id), "duplicate identifier");
        } else {
            assert!(tile.id.is_none(), "{:?} carries an identifier", tile.kind);
        }
    }
    let counts = FeatureCounts::for_level(Biome::Earth, 1);
    let minimum = counts.supplies + counts.fragments + counts.power_cells;
    assert!(seen.len() >= minimum as usize);
}

#[test]
fn enemies_face_a_direction() {
    let world = generate(Biome::AlienCity, 5, 17);
    assert!(world.grid.count(TileKind::Enemy) > 0);
    for tile in world.grid.iter() {
        assert_eq!(tile.facing.is_some(), tile.kind == TileKind::Enemy);
    }
}

#[test]
fn explorable_worlds_start_hidden() {
    let world = generate(Biome::Jungle, 2, 5);
    assert!(world.grid.iter().all(|tile| !tile.discovered));
}

#[test]
fn terminal_world_is_revealed_and_featureless() {
    let world = generate(Biome::Atlantis, 6, 21);

    assert!(world.grid.iter().all(|tile| tile.discovered));
    assert!(world
        .grid
        .iter()
        .all(|tile| matches!(tile.kind, TileKind::Empty | TileKind::Wall | TileKind::Gate)));
    assert_eq!(world.grid.count(TileKind::Gate), 1);
}

#[test]
fn identical_seeds_generate_identical_worlds() {
    let first = generate(Biome::Jungle, 3, 1234);
    let second = generate(Biome::Jungle, 3, 1234);
    assert_eq!(first, second);

    let other = generate(Biome::Jungle, 3, 4321);
    assert_ne!(first.grid, other.grid);
}
