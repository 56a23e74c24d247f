use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::grid::{CollectibleId, Position, Tile, TileGrid, WorldSize};

/// Identifier of a world and of the gate address that reaches it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(String);

impl WorldId {
    /// Creates a new world identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Environment family of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    /// The home world.
    Earth,
    /// Dense vegetation.
    Jungle,
    /// Sand and heat.
    Desert,
    /// Ice fields.
    Arctic,
    /// Lava and ash.
    Volcanic,
    /// Abandoned alien architecture.
    AlienCity,
    /// The terminal destination; fully revealed, no exploration phase.
    Atlantis,
}

impl Biome {
    /// Reports whether this is the home world's biome.
    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, Self::Earth)
    }

    /// Reports whether this is the terminal destination's biome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Atlantis)
    }

    /// Human readable biome label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Earth => "earth",
            Self::Jungle => "jungle",
            Self::Desert => "desert",
            Self::Arctic => "arctic",
            Self::Volcanic => "volcanic",
            Self::AlienCity => "alien city",
            Self::Atlantis => "atlantis",
        }
    }
}

/// A generated world: a fixed grid plus the positions the engine tracks on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Identifier shared with the gate address of the world.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// Environment family used during generation.
    pub biome: Biome,
    /// Tile grid; dimensions never change after generation.
    pub grid: TileGrid,
    /// Last position of the player on this world, kept in lockstep with the player record.
    pub player_position: Position,
    /// Location of the single gate tile. Immutable after generation.
    pub gate_position: Position,
    /// Whether the player has entered the world at least once.
    pub discovered: bool,
}

impl World {
    /// Dimensions of the world grid.
    #[must_use]
    pub const fn size(&self) -> WorldSize {
        self.grid.size()
    }

    /// Tile at the provided position, if it lies inside the world.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.grid.tile(position)
    }
}

/// A dialable destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateAddress {
    /// Identifier of the world reached through this address.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// Biome used when the world is generated on first visit.
    pub biome: Biome,
    /// Symbol sequence shown by the dialing interface.
    pub symbols: Vec<String>,
    /// Whether the destination has been visited.
    pub discovered: bool,
    /// Marks the single terminal destination that needs extra preconditions to dial.
    pub is_eight_chevron: bool,
}

/// Resource counters and inventory of the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Position on the active world.
    pub position: Position,
    /// Remaining supplies, always within `0..=max_supplies`.
    pub supplies: u32,
    /// Supply capacity.
    pub max_supplies: u32,
    /// Collected artifact identifiers, without duplicates.
    pub artifacts: Vec<CollectibleId>,
    /// Fragments collected toward the next destination unlock.
    pub gate_fragments: u32,
    /// Whether the player carries the power cell needed to dial the terminal destination.
    pub has_power_cell: bool,
}

impl Player {
    /// Creates a player at full supplies.
    #[must_use]
    pub fn new(position: Position, max_supplies: u32) -> Self {
        Self {
            position,
            supplies: max_supplies,
            max_supplies,
            artifacts: Vec::new(),
            gate_fragments: 0,
            has_power_cell: false,
        }
    }

    /// Reports whether the artifact is already in the inventory.
    #[must_use]
    pub fn has_artifact(&self, artifact: &CollectibleId) -> bool {
        self.artifacts.iter().any(|held| held == artifact)
    }
}

/// Phase of the session derived from the terminal flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The session accepts moves and travel.
    Exploring,
    /// Supplies ran out.
    Failed,
    /// The terminal destination was reached.
    Victorious,
}

/// Root aggregate of a play session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Active world, always a key of `worlds` when present.
    pub current_world: Option<WorldId>,
    /// Every world generated so far.
    pub worlds: BTreeMap<WorldId, World>,
    /// The player record.
    pub player: Player,
    /// Destination registry in discovery order.
    pub addresses: Vec<GateAddress>,
    /// Set when the session reached a terminal state.
    pub game_over: bool,
    /// Set when the terminal destination was reached; implies `game_over`.
    pub victory: bool,
    /// Progression level; grows by one per catalog destination minted.
    pub current_level: u32,
}

impl GameState {
    /// World the player is currently on.
    #[must_use]
    pub fn active_world(&self) -> Option<&World> {
        self.current_world
            .as_ref()
            .and_then(|id| self.worlds.get(id))
    }

    /// Mutable access to the world the player is currently on.
    pub fn active_world_mut(&mut self) -> Option<&mut World> {
        let id = self.current_world.as_ref()?;
        self.worlds.get_mut(id)
    }

    /// Registry entry for the provided destination.
    #[must_use]
    pub fn address(&self, id: &WorldId) -> Option<&GateAddress> {
        self.addresses.iter().find(|address| &address.id == id)
    }

    /// Mutable registry entry for the provided destination.
    pub fn address_mut(&mut self, id: &WorldId) -> Option<&mut GateAddress> {
        self.addresses.iter_mut().find(|address| &address.id == id)
    }

    /// Terminal destination, once it has been registered.
    #[must_use]
    pub fn terminal_address(&self) -> Option<&GateAddress> {
        self.addresses.iter().find(|address| address.is_eight_chevron)
    }

    /// Current phase of the session.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        if self.victory {
            Outcome::Victorious
        } else if self.game_over {
            Outcome::Failed
        } else {
            Outcome::Exploring
        }
    }
}
