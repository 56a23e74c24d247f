use gate_explorer_core::{Command, Event, GameState, StateStore};
use log::warn;

use crate::{apply, query, Config, Engine};

/// An engine bound to the store that persists it.
///
/// The state is saved after every dispatched command. A reset clears the
/// store before the fresh state is written.
#[derive(Debug)]
pub struct Session<S> {
    engine: Engine,
    store: S,
}

impl<S> Session<S>
where
    S: StateStore,
{
    /// Loads the stored session, or starts a new one when the store is empty.
    pub fn open(
        config: Config,
        mut store: S,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, S::Error> {
        let engine = match store.load()? {
            Some(state) => Engine::from_state(state, config),
            None => {
                out_events.push(Event::MissionStarted);
                Engine::new(config)
            }
        };
        store.save(query::state(&engine))?;
        Ok(Self { engine, store })
    }

    /// Applies the command and persists the resulting state.
    pub fn dispatch(
        &mut self,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> Result<(), S::Error> {
        let reset = matches!(command, Command::Reset);
        apply(&mut self.engine, command, out_events);
        if reset {
            self.store.clear()?;
        }
        self.persist()
    }

    /// Replaces the whole session with an externally supplied state.
    pub fn replace_state(&mut self, state: GameState) -> Result<(), S::Error> {
        let config = *query::config(&self.engine);
        self.engine = Engine::from_state(state, config);
        self.persist()
    }

    /// Read-only access to the engine.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Read-only access to the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<(), S::Error> {
        self.store
            .save(query::state(&self.engine))
            .inspect_err(|error| warn!("failed to persist session: {error}"))
    }
}
