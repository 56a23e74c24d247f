#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Storage backends for Gate Explorer sessions.
//!
//! [`JsonFileStore`] keeps one session on disk inside a versioned envelope,
//! [`MemoryStore`] keeps it in memory, and the transfer helpers turn a whole
//! session into a single line of text that can be pasted elsewhere.

mod file;
mod memory;
mod transfer;

use std::collections::BTreeSet;

use gate_explorer_core::{CollectibleId, GameState, TileKind, WorldId};

pub use file::{JsonFileStore, StoreError, SAVE_VERSION};
pub use memory::MemoryStore;
pub use transfer::{decode_state, encode_state, TransferError, TRANSFER_HEADER};

/// Structural problem found in a decoded session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    /// The active world is missing from the world map.
    #[error("the active world is not part of the session")]
    DanglingActiveWorld,
    /// Victory was recorded without ending the session.
    #[error("victory is recorded but the session is still running")]
    VictoryWithoutGameOver,
    /// Supplies exceed the player's capacity.
    #[error("supplies exceed the player's capacity")]
    SuppliesOverCapacity,
    /// The difficulty level is below the starting level.
    #[error("the session level must be at least 1")]
    LevelBelowStart,
    /// The same artifact is recorded more than once.
    #[error("artifact {0} is recorded twice")]
    DuplicateArtifact(CollectibleId),
    /// A world does not hold exactly one gate at its gate position.
    #[error("world {0} does not hold a single gate at its gate position")]
    MisplacedGate(WorldId),
    /// A world's stored player position lies outside its grid.
    #[error("world {0} places the player outside its grid")]
    PlayerOutsideWorld(WorldId),
    /// The player and the active world disagree on the player's position.
    #[error("the player is not where the active world expects")]
    PlayerOutOfStep,
}

/// Checks the aggregate invariants that a decoded session must satisfy.
pub fn check_consistency(state: &GameState) -> Result<(), Inconsistency> {
    if let Some(id) = &state.current_world {
        let world = state
            .worlds
            .get(id)
            .ok_or(Inconsistency::DanglingActiveWorld)?;
        if world.player_position != state.player.position {
            return Err(Inconsistency::PlayerOutOfStep);
        }
    }
    if state.victory && !state.game_over {
        return Err(Inconsistency::VictoryWithoutGameOver);
    }
    if state.player.supplies > state.player.max_supplies {
        return Err(Inconsistency::SuppliesOverCapacity);
    }
    if state.current_level < 1 {
        return Err(Inconsistency::LevelBelowStart);
    }

    let mut artifacts = BTreeSet::new();
    for artifact in &state.player.artifacts {
        if !artifacts.insert(artifact) {
            return Err(Inconsistency::DuplicateArtifact(artifact.clone()));
        }
    }

    for world in state.worlds.values() {
        let gates = world.grid.count(TileKind::Gate);
        if gates != 1 || world.grid.kind_at(world.gate_position) != Some(TileKind::Gate) {
            return Err(Inconsistency::MisplacedGate(world.id.clone()));
        }
        if !world.size().contains(world.player_position) {
            return Err(Inconsistency::PlayerOutsideWorld(world.id.clone()));
        }
    }
    Ok(())
}
