#![allow(dead_code)]

use std::{collections::BTreeMap, time::Duration};

use gate_explorer_core::{
    Biome, CollectibleId, Command, Direction, Event, GameState, GateAddress, Player, Position,
    TileGrid, TileKind, World, WorldId, WorldSize,
};
use gate_explorer_engine::{apply, Config, Engine, MAX_SUPPLIES};
use gate_explorer_system_catalog::{seed_addresses, terminal_address, HOME_ID};

pub const GATE: Position = Position::new(4, 2);

/// A 9x5 world ringed by walls with its gate in the centre.
pub fn walled_world(id: &str, biome: Biome) -> World {
    let size = WorldSize::new(9, 5);
    let mut grid = TileGrid::filled(size, false);
    for tile in 0..size.cell_count() {
        let position = Position::new((tile % 9) as i32, (tile / 9) as i32);
        if size.is_border(position) {
            stamp(&mut grid, position, TileKind::Wall, None);
        }
    }
    stamp(&mut grid, GATE, TileKind::Gate, None);

    World {
        id: WorldId::new(id),
        name: format!("{id} world"),
        biome,
        grid,
        player_position: GATE,
        gate_position: GATE,
        discovered: true,
    }
}

pub fn stamp(grid: &mut TileGrid, position: Position, kind: TileKind, id: Option<&str>) {
    let tile = grid.tile_mut(position).expect("position inside grid");
    tile.kind = kind;
    tile.id = id.map(CollectibleId::new);
}

/// A session standing on the gate of a hand-built home world.
pub fn home_state() -> GameState {
    let home = walled_world(HOME_ID, Biome::Earth);
    let mut worlds = BTreeMap::new();
    let _ = worlds.insert(home.id.clone(), home);

    GameState {
        current_world: Some(WorldId::new(HOME_ID)),
        worlds,
        player: Player::new(GATE, MAX_SUPPLIES),
        addresses: seed_addresses(),
        game_over: false,
        victory: false,
        current_level: 1,
    }
}

pub fn with_terminal(mut state: GameState) -> GameState {
    state.addresses.push(terminal_address());
    state
}

pub fn home_world_mut(state: &mut GameState) -> &mut World {
    state
        .worlds
        .get_mut(&WorldId::new(HOME_ID))
        .expect("home world present")
}

pub fn engine_for(state: GameState) -> Engine {
    Engine::from_state(state, Config::new(Duration::ZERO, Some(11)))
}

pub fn step(engine: &mut Engine, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        engine,
        Command::Move {
            direction,
            issued_at: Duration::ZERO,
        },
        &mut events,
    );
    events
}

pub fn dispatch(engine: &mut Engine, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(engine, command, &mut events);
    events
}

pub fn travel(destination: &str) -> Command {
    Command::Travel {
        destination: WorldId::new(destination),
    }
}

pub fn address<'a>(state: &'a GameState, id: &str) -> &'a GateAddress {
    state
        .address(&WorldId::new(id))
        .expect("address registered")
}
