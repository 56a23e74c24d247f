use std::convert::Infallible;

use gate_explorer_core::{GameState, StateStore};

/// Keeps the session in memory for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    state: Option<GameState>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a session.
    #[must_use]
    pub fn with_state(state: GameState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    /// Most recently saved session.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    type Error = Infallible;

    fn load(&mut self) -> Result<Option<GameState>, Self::Error> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &GameState) -> Result<(), Self::Error> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.state = None;
        Ok(())
    }
}
