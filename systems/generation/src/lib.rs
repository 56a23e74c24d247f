#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural world generator.
//!
//! A world is a fixed-size grid ringed by walls, sprinkled with obstacles that
//! keep clear of the centre, and populated with points of interest whose
//! counts scale with the difficulty level. The player start and the gate share
//! the centre cell, which is reserved before any feature is placed. Feature
//! placement uses bounded searches, so every count is an upper bound: a
//! feature that cannot find room is left out. The power cell and the gate
//! fragments are placed first, while the grid is emptiest.

use gate_explorer_core::{
    Biome, CollectibleId, Position, TileGrid, TileKind, World, WorldId, WorldSize,
};
use gate_explorer_system_placement::{
    find_adjacent_empty, find_empty_position, random_orthogonal_direction,
};
use log::debug;
use rand::Rng;

/// Dimensions shared by every generated world.
pub const GRID_SIZE: WorldSize = WorldSize::new(20, 13);

/// Share of all cells, in percent, that receive an obstacle attempt.
pub const OBSTACLE_PERCENT: usize = 15;

/// Minimum Manhattan distance between an obstacle and the centre cell.
pub const CENTER_CLEARANCE: u32 = 3;

/// Probability that a ruin spawns an artifact next to it.
pub const ARTIFACT_CHANCE: f64 = 0.7;

/// Fragments guaranteed on the home world so the first unlock is reachable.
pub const HOME_MIN_FRAGMENTS: u32 = 3;

/// Upper bounds on the number of each feature placed in a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureCounts {
    /// Ruins, each with a chance of an adjacent artifact.
    pub ruins: u32,
    /// Supply caches.
    pub supplies: u32,
    /// Gate fragments.
    pub fragments: u32,
    /// Power cells; only the home world receives one.
    pub power_cells: u32,
    /// Hazards.
    pub hazards: u32,
    /// Enemies.
    pub enemies: u32,
}

impl FeatureCounts {
    /// Feature budget for a world of the provided biome and difficulty level.
    #[must_use]
    pub fn for_level(biome: Biome, level: u32) -> Self {
        if biome.is_terminal() {
            return Self::none();
        }

        let mut fragments = 2 + level / 2;
        if biome.is_home() {
            fragments = fragments.max(HOME_MIN_FRAGMENTS);
        }

        Self {
            ruins: 3 + level,
            supplies: 8 + 2 * level,
            fragments,
            power_cells: u32::from(biome.is_home()),
            hazards: level * 3 / 2 + 2,
            enemies: level + 1,
        }
    }

    const fn none() -> Self {
        Self {
            ruins: 0,
            supplies: 0,
            fragments: 0,
            power_cells: 0,
            hazards: 0,
            enemies: 0,
        }
    }
}

/// Generates a complete world.
///
/// The terminal biome produces a showcase world: walls and obstacles only,
/// with every tile already discovered.
pub fn generate_world<R>(
    id: WorldId,
    name: impl Into<String>,
    biome: Biome,
    level: u32,
    rng: &mut R,
) -> World
where
    R: Rng + ?Sized,
{
    let mut grid = TileGrid::filled(GRID_SIZE, biome.is_terminal());
    let center = GRID_SIZE.center();

    stamp_border(&mut grid);
    scatter_obstacles(&mut grid, center, rng);

    // The centre is reserved up front so no feature lands under the gate.
    set_gate(&mut grid, center);

    let counts = FeatureCounts::for_level(biome, level);
    let mut populator = Populator {
        grid: &mut grid,
        world: &id,
        omitted: 0,
    };
    populator.place_power_cells(counts.power_cells, rng);
    populator.place_collectibles(TileKind::GateFragment, counts.fragments, rng);
    populator.place_ruins(counts.ruins, rng);
    populator.place_collectibles(TileKind::Supplies, counts.supplies, rng);
    populator.place_plain(TileKind::Hazard, counts.hazards, rng);
    populator.place_enemies(counts.enemies, rng);
    let omitted = populator.omitted;

    set_gate(&mut grid, center);

    debug!(
        "generated world {id} ({}) at level {level}; {omitted} feature(s) omitted",
        biome.label()
    );

    World {
        id,
        name: name.into(),
        biome,
        grid,
        player_position: center,
        gate_position: center,
        discovered: false,
    }
}

fn set_gate(grid: &mut TileGrid, center: Position) {
    if let Some(tile) = grid.tile_mut(center) {
        let _ = tile.consume();
        tile.kind = TileKind::Gate;
    }
}

fn stamp_border(grid: &mut TileGrid) {
    let size = grid.size();
    for row in 0..size.height() {
        for column in 0..size.width() {
            let position = position_of(column, row);
            if !size.is_border(position) {
                continue;
            }
            if let Some(tile) = grid.tile_mut(position) {
                tile.kind = TileKind::Wall;
            }
        }
    }
}

fn scatter_obstacles<R>(grid: &mut TileGrid, center: Position, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let size = grid.size();
    if size.width() < 3 || size.height() < 3 {
        return;
    }

    let attempts = size.cell_count() * OBSTACLE_PERCENT / 100;
    for _ in 0..attempts {
        let candidate = position_of(
            rng.gen_range(1..size.width() - 1),
            rng.gen_range(1..size.height() - 1),
        );
        if candidate.manhattan_distance(center) < CENTER_CLEARANCE {
            continue;
        }
        if let Some(tile) = grid.tile_mut(candidate) {
            if tile.kind == TileKind::Empty {
                tile.kind = TileKind::Wall;
            }
        }
    }
}

fn position_of(column: u32, row: u32) -> Position {
    Position::new(
        i32::try_from(column).unwrap_or(i32::MAX),
        i32::try_from(row).unwrap_or(i32::MAX),
    )
}

struct Populator<'a> {
    grid: &'a mut TileGrid,
    world: &'a WorldId,
    omitted: u32,
}

impl Populator<'_> {
    fn place_ruins<R>(&mut self, count: u32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for index in 0..count {
            let Some(ruin) = self.claim(TileKind::Ruins, None, rng) else {
                continue;
            };
            if !rng.gen_bool(ARTIFACT_CHANCE) {
                continue;
            }
            match find_adjacent_empty(&*self.grid, ruin) {
                Some(spot) => {
                    let id = self.id_for(TileKind::Artifact, index);
                    self.stamp(spot, TileKind::Artifact, Some(id));
                }
                None => self.omit(TileKind::Artifact),
            }
        }
    }

    fn place_collectibles<R>(&mut self, kind: TileKind, count: u32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for index in 0..count {
            let id = self.id_for(kind, index);
            let _ = self.claim(kind, Some(id), rng);
        }
    }

    fn place_power_cells<R>(&mut self, count: u32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for _ in 0..count {
            let id = CollectibleId::new(format!(
                "{}-{}",
                TileKind::PowerCell.label(),
                self.world
            ));
            let _ = self.claim(TileKind::PowerCell, Some(id), rng);
        }
    }

    fn place_plain<R>(&mut self, kind: TileKind, count: u32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for _ in 0..count {
            let _ = self.claim(kind, None, rng);
        }
    }

    fn place_enemies<R>(&mut self, count: u32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for _ in 0..count {
            let Some(position) = self.claim(TileKind::Enemy, None, rng) else {
                continue;
            };
            if let Some(tile) = self.grid.tile_mut(position) {
                tile.facing = Some(random_orthogonal_direction(rng));
            }
        }
    }

    fn claim<R>(
        &mut self,
        kind: TileKind,
        id: Option<CollectibleId>,
        rng: &mut R,
    ) -> Option<Position>
    where
        R: Rng + ?Sized,
    {
        let Some(position) = find_empty_position(&*self.grid, None, rng) else {
            self.omit(kind);
            return None;
        };
        self.stamp(position, kind, id);
        Some(position)
    }

    fn stamp(&mut self, position: Position, kind: TileKind, id: Option<CollectibleId>) {
        if let Some(tile) = self.grid.tile_mut(position) {
            tile.kind = kind;
            tile.id = id;
        }
    }

    fn omit(&mut self, kind: TileKind) {
        self.omitted += 1;
        debug!("no room left for {} on world {}", kind.label(), self.world);
    }

    fn id_for(&self, kind: TileKind, index: u32) -> CollectibleId {
        CollectibleId::new(format!("{}-{}-{index}", kind.label(), self.world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_budget_scales_with_level() {
        let counts = FeatureCounts::for_level(Biome::Jungle, 4);
        assert_eq!(
            counts,
            FeatureCounts {
                ruins: 7,
                supplies: 16,
                fragments: 4,
                power_cells: 0,
                hazards: 8,
                enemies: 5,
            }
        );
    }

    #[test]
    fn hazards_round_down_for_odd_levels() {
        assert_eq!(FeatureCounts::for_level(Biome::Desert, 1).hazards, 3);
        assert_eq!(FeatureCounts::for_level(Biome::Desert, 3).hazards, 6);
    }

    #[test]
    fn home_world_guarantees_three_fragments_and_a_power_cell() {
        let counts = FeatureCounts::for_level(Biome::Earth, 1);
        assert_eq!(counts.fragments, HOME_MIN_FRAGMENTS);
        assert_eq!(counts.power_cells, 1);
        assert_eq!(FeatureCounts::for_level(Biome::Jungle, 1).fragments, 2);
    }

    #[test]
    fn terminal_biome_receives_no_features() {
        assert_eq!(
            FeatureCounts::for_level(Biome::Atlantis, 9),
            FeatureCounts::none()
        );
    }
}
