#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gate Explorer engine.
//!
//! This crate defines the data model of a play session and the message
//! surface that connects adapters with the authoritative engine. Adapters
//! submit [`Command`] values describing player intents, the engine validates
//! and executes them, and then reports [`Event`] values. Every event that a
//! player should see maps onto a short [`Notice`] through [`Event::notice`].
//! Persistence is reached exclusively through the [`StateStore`] contract.

mod grid;
mod state;

use std::{str::FromStr, time::Duration};

use thiserror::Error;

pub use grid::{
    CollectibleId, Direction, GridShapeError, Position, Tile, TileGrid, TileKind, WorldSize,
};
pub use state::{Biome, GameState, GateAddress, Outcome, Player, World, WorldId};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Gate Explorer.";

/// Commands that express every intent the engine recognises.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests a single step of the player.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
        /// Monotonic timestamp of the input, used by the move rate limiter.
        issued_at: Duration,
    },
    /// Requests travel through the gate to the provided destination.
    Travel {
        /// Destination identifier taken from the address registry.
        destination: WorldId,
    },
    /// Requests a description of the tile at the provided position.
    Interact {
        /// Cell to inspect on the active world.
        position: Position,
    },
    /// Applies a debug shortcut.
    Cheat {
        /// Shortcut to apply.
        code: CheatCode,
    },
    /// Discards the session and starts a new one.
    Reset,
}

/// Debug shortcuts understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheatCode {
    /// Mints the next catalog destination as if enough fragments were collected.
    AdvanceProgression,
    /// Grants the power cell.
    GrantPowerCell,
}

impl CheatCode {
    /// Short textual code accepted by [`CheatCode::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdvanceProgression => "advance",
            Self::GrantPowerCell => "powercell",
        }
    }
}

/// Error returned when a debug code is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown debug code `{0}`")]
pub struct UnknownCheatCode(pub String);

impl FromStr for CheatCode {
    type Err = UnknownCheatCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "advance" | "level" | "levelup" => Ok(Self::AdvanceProgression),
            "powercell" | "power" | "zpm" => Ok(Self::GrantPowerCell),
            other => Err(UnknownCheatCode(other.to_owned())),
        }
    }
}

/// Reasons a move request is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum MoveRejection {
    /// No world is active.
    #[error("no active world")]
    NoActiveWorld,
    /// The session already ended.
    #[error("the mission is over")]
    SessionOver,
    /// The target cell lies outside the grid.
    #[error("the edge of the world blocks the way")]
    OutOfBounds,
    /// The target cell is a wall.
    #[error("a wall blocks the way")]
    Blocked,
    /// The request arrived inside the cooldown window of the previous move.
    #[error("moving too fast")]
    Debounced,
}

/// Reasons a travel request is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TravelError {
    /// The destination is not in the address registry.
    #[error("Cannot find destination")]
    UnknownDestination,
    /// The player is not standing on the active world's gate.
    #[error("You must be at the Stargate to dial out!")]
    NotAtGate,
    /// The player already is on the destination world.
    #[error("The gate is already connected to this world")]
    AlreadyThere,
    /// The terminal destination can only be dialed from the home world.
    #[error("The eight-chevron address can only be dialed from Earth")]
    TerminalRequiresHome,
    /// The terminal destination needs the power cell.
    #[error("Dialing eight chevrons requires a power cell")]
    TerminalRequiresPowerCell,
    /// The session already ended.
    #[error("The mission is over. Start a new mission to continue")]
    SessionOver,
}

/// Reasons a debug shortcut is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CheatError {
    /// The session already ended.
    #[error("The mission is over. Start a new mission to continue")]
    SessionOver,
    /// Every catalog destination has been minted.
    #[error("Debug: every gate address is already unlocked")]
    CatalogExhausted,
    /// The player already holds the power cell.
    #[error("Debug: the power cell is already in your pack")]
    PowerCellAlreadyHeld,
}

/// Events reported by the engine after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new session was created.
    MissionStarted,
    /// A move request was dropped without changing state.
    MoveRejected {
        /// Direction of the dropped request.
        direction: Direction,
        /// Specific reason the move was dropped.
        reason: MoveRejection,
    },
    /// The player stepped onto a new cell.
    PlayerMoved {
        /// World the move happened on.
        world: WorldId,
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
    },
    /// The player entered a hazard.
    HazardStruck {
        /// Cell of the hazard.
        position: Position,
        /// Supplies lost on top of the movement cost.
        penalty: u32,
    },
    /// The player ran into an enemy.
    EnemyEncountered {
        /// Cell of the enemy.
        position: Position,
        /// Supplies lost on top of the movement cost.
        penalty: u32,
    },
    /// A supply cache was picked up.
    SuppliesCollected {
        /// Cell of the consumed cache.
        position: Position,
        /// Supplies restored.
        amount: u32,
    },
    /// An artifact was added to the inventory.
    ArtifactCollected {
        /// Cell of the consumed artifact.
        position: Position,
        /// Identifier of the artifact.
        artifact: CollectibleId,
    },
    /// A gate fragment was picked up.
    FragmentCollected {
        /// Cell of the consumed fragment.
        position: Position,
        /// Fragment counter after the pickup, before any unlock reset.
        total: u32,
    },
    /// The power cell was picked up.
    PowerCellCollected {
        /// Cell of the consumed power cell.
        position: Position,
    },
    /// The player stepped onto the gate.
    GateReached {
        /// Cell of the gate.
        position: Position,
    },
    /// A world was generated and stored in the session.
    WorldGenerated {
        /// Identifier of the new world.
        world: WorldId,
        /// Biome used for generation.
        biome: Biome,
    },
    /// A new destination was added to the registry.
    DestinationUnlocked {
        /// Identifier of the new destination.
        destination: WorldId,
        /// Display name of the new destination.
        name: String,
        /// Progression level after the unlock.
        level: u32,
    },
    /// The terminal destination was added to the registry.
    TerminalDestinationRevealed {
        /// Identifier of the terminal destination.
        destination: WorldId,
        /// Display name of the terminal destination.
        name: String,
    },
    /// Fragments reached the unlock threshold but no catalog destination remains.
    ProgressionExhausted {
        /// Fragments currently held.
        fragments: u32,
    },
    /// Supplies reached zero and the session failed.
    SuppliesExhausted,
    /// A travel request was refused without changing state.
    TravelRejected {
        /// Requested destination.
        destination: WorldId,
        /// Specific reason the request was refused.
        reason: TravelError,
    },
    /// The player traveled through the gate.
    Traveled {
        /// World left behind.
        from: Option<WorldId>,
        /// World arrived at.
        to: WorldId,
        /// Display name of the destination.
        name: String,
    },
    /// The terminal destination was reached and the session was won.
    VictoryAchieved {
        /// Display name of the terminal destination.
        name: String,
    },
    /// A tile was inspected.
    TileInspected {
        /// Inspected cell.
        position: Position,
        /// Kind found there, if the cell lies inside the active world.
        kind: Option<TileKind>,
    },
    /// A debug shortcut took effect.
    CheatApplied {
        /// Applied shortcut.
        code: CheatCode,
    },
    /// A debug shortcut was refused without changing state.
    CheatRejected {
        /// Requested shortcut.
        code: CheatCode,
        /// Specific reason the shortcut was refused.
        reason: CheatError,
    },
}

impl Event {
    /// Player-facing notification for the event, if it warrants one.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            Self::MissionStarted => Notice::success("New mission started"),
            Self::MoveRejected { .. } | Self::PlayerMoved { .. } | Self::WorldGenerated { .. } => {
                return None;
            }
            Self::HazardStruck { penalty, .. } => {
                Notice::error(format!("Hazard encountered! Lost {penalty} supplies"))
            }
            Self::EnemyEncountered { penalty, .. } => {
                Notice::error(format!("Enemy encounter! Lost {penalty} supplies"))
            }
            Self::SuppliesCollected { amount, .. } => {
                Notice::success(format!("Supplies collected! Gained {amount} supplies"))
            }
            Self::ArtifactCollected { .. } => Notice::success("Artifact collected!"),
            Self::FragmentCollected { .. } => Notice::success("Gate fragment collected!"),
            Self::PowerCellCollected { .. } => {
                Notice::success("Power cell recovered! Eight chevrons can now be dialed from Earth")
            }
            Self::GateReached { .. } => {
                Notice::info("Stargate activated! Use controls to travel.")
            }
            Self::DestinationUnlocked { name, .. } => {
                Notice::success(format!("New address discovered: {name}"))
            }
            Self::TerminalDestinationRevealed { name, .. } => {
                Notice::success(format!("An eight-chevron address appeared: {name}"))
            }
            Self::ProgressionExhausted { .. } => {
                Notice::info("Every gate address is already known")
            }
            Self::SuppliesExhausted => Notice::error("Out of supplies! Mission failed."),
            Self::TravelRejected { reason, .. } => Notice::error(reason.to_string()),
            Self::Traveled { name, .. } => Notice::success(format!("Traveled to {name}")),
            Self::VictoryAchieved { name } => {
                Notice::success(format!("You reached {name}. Mission accomplished!"))
            }
            Self::TileInspected { kind, .. } => Notice::info(match kind {
                Some(TileKind::Ruins) => "Ancient ruins. Search nearby for artifacts.",
                Some(TileKind::Gate) => "Stargate is active. Use the control panel to travel.",
                _ => "Nothing special here.",
            }),
            Self::CheatApplied { code } => match code {
                CheatCode::AdvanceProgression => Notice::info("Debug: progression advanced"),
                CheatCode::GrantPowerCell => Notice::info("Debug: power cell granted"),
            },
            Self::CheatRejected { reason, .. } => Notice::error(reason.to_string()),
        };
        Some(notice)
    }
}

/// Importance of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Something good happened.
    Success,
    /// Something went wrong or cost the player.
    Error,
}

/// Short human readable status message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Importance of the message.
    pub severity: Severity,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Creates an informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Storage for the single persisted session blob.
pub trait StateStore {
    /// Error reported by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads the stored session, or `None` when nothing has been stored.
    fn load(&mut self) -> Result<Option<GameState>, Self::Error>;

    /// Replaces the stored session.
    fn save(&mut self, state: &GameState) -> Result<(), Self::Error>;

    /// Removes the stored session.
    fn clear(&mut self) -> Result<(), Self::Error>;
}
