#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Gate Explorer.
//!
//! The engine owns the [`GameState`] aggregate together with the random
//! source and the move limiter. Every intent flows through [`apply`], which
//! validates the command before touching any state: a rejected command leaves
//! the aggregate exactly as it was and reports the reason as an [`Event`].

mod session;

use std::{collections::BTreeMap, time::Duration};

use gate_explorer_core::{
    CheatCode, CheatError, Command, Direction, Event, GameState, MoveRejection, Player, Position,
    TileKind, TravelError, WorldId, WELCOME_BANNER,
};
use gate_explorer_system_catalog::{
    final_level, generate_for_address, generate_new_world, home_world, is_exhausted,
    seed_addresses, terminal_address, STARTING_LEVEL,
};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use session::Session;

/// Supply capacity of a fresh player.
pub const MAX_SUPPLIES: u32 = 50;

/// Supplies spent by every accepted move.
pub const MOVE_COST: u32 = 1;

/// Extra supplies lost when entering a hazard.
pub const HAZARD_PENALTY: u32 = 5;

/// Extra supplies lost when entering an enemy.
pub const ENEMY_PENALTY: u32 = 10;

/// Largest amount a single supply cache restores.
pub const SUPPLY_RESTORE: u32 = 10;

/// Fragments required to mint the next destination.
pub const FRAGMENT_THRESHOLD: u32 = 3;

/// Manhattan radius revealed around the player.
pub const DISCOVERY_RADIUS: u32 = 2;

/// Minimum spacing between two accepted moves.
pub const DEFAULT_MOVE_COOLDOWN: Duration = Duration::from_millis(150);

/// Tunable parameters of an engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    move_cooldown: Duration,
    rng_seed: Option<u64>,
}

impl Config {
    /// Creates a configuration; a missing seed is drawn from entropy.
    #[must_use]
    pub const fn new(move_cooldown: Duration, rng_seed: Option<u64>) -> Self {
        Self {
            move_cooldown,
            rng_seed,
        }
    }

    /// Minimum spacing between two accepted moves.
    #[must_use]
    pub const fn move_cooldown(&self) -> Duration {
        self.move_cooldown
    }

    /// Seed of the generation random source, if fixed.
    #[must_use]
    pub const fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_COOLDOWN, None)
    }
}

/// Represents the authoritative Gate Explorer session state.
#[derive(Clone, Debug)]
pub struct Engine {
    banner: &'static str,
    state: GameState,
    rng: ChaCha8Rng,
    config: Config,
    last_accepted_move: Option<Duration>,
}

impl Engine {
    /// Creates an engine holding a brand-new session.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = seeded_rng(config);
        let state = initial_state(&mut rng);
        info!("started a new mission on {}", home_label(&state));
        Self::assemble(state, rng, config)
    }

    /// Creates an engine that resumes a previously stored session.
    #[must_use]
    pub fn from_state(state: GameState, config: Config) -> Self {
        let rng = seeded_rng(config);
        info!(
            "resumed mission at level {} with {} world(s)",
            state.current_level,
            state.worlds.len()
        );
        Self::assemble(state, rng, config)
    }

    /// Consumes the engine and yields the owned session state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    fn assemble(state: GameState, rng: ChaCha8Rng, config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            state,
            rng,
            config,
            last_accepted_move: None,
        }
    }

    fn move_player(
        &mut self,
        direction: Direction,
        issued_at: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let target = match self.validate_move(direction, issued_at) {
            Ok(target) => target,
            Err(reason) => {
                debug!("move {direction:?} rejected: {reason}");
                out_events.push(Event::MoveRejected { direction, reason });
                return;
            }
        };
        self.last_accepted_move = Some(issued_at);

        let Some(world_id) = self.state.current_world.clone() else {
            return;
        };
        let Some(world) = self.state.worlds.get_mut(&world_id) else {
            return;
        };
        let player = &mut self.state.player;
        let from = player.position;
        let mut supplies = player.supplies.saturating_sub(MOVE_COST);
        let mut fragment_collected = false;

        player.position = target;
        world.player_position = target;
        world.grid.reveal_around(target, DISCOVERY_RADIUS);
        out_events.push(Event::PlayerMoved {
            world: world_id,
            from,
            to: target,
        });

        if let Some(tile) = world.grid.tile_mut(target) {
            match tile.kind {
                TileKind::Hazard => {
                    supplies = supplies.saturating_sub(HAZARD_PENALTY);
                    out_events.push(Event::HazardStruck {
                        position: target,
                        penalty: HAZARD_PENALTY,
                    });
                }
                TileKind::Enemy => {
                    supplies = supplies.saturating_sub(ENEMY_PENALTY);
                    out_events.push(Event::EnemyEncountered {
                        position: target,
                        penalty: ENEMY_PENALTY,
                    });
                }
                TileKind::Supplies => {
                    if tile.id.is_some() && supplies < player.max_supplies {
                        let amount = SUPPLY_RESTORE.min(player.max_supplies - supplies);
                        supplies += amount;
                        let _ = tile.consume();
                        out_events.push(Event::SuppliesCollected {
                            position: target,
                            amount,
                        });
                    }
                }
                TileKind::Artifact => {
                    if tile.id.is_some() {
                        let artifact = tile.consume().filter(|id| !player.has_artifact(id));
                        if let Some(artifact) = artifact {
                            player.artifacts.push(artifact.clone());
                            out_events.push(Event::ArtifactCollected {
                                position: target,
                                artifact,
                            });
                        }
                    }
                }
                TileKind::GateFragment => {
                    let _ = tile.consume();
                    player.gate_fragments += 1;
                    fragment_collected = true;
                    out_events.push(Event::FragmentCollected {
                        position: target,
                        total: player.gate_fragments,
                    });
                }
                TileKind::PowerCell => {
                    let _ = tile.consume();
                    if !player.has_power_cell {
                        player.has_power_cell = true;
                        info!("power cell recovered");
                        out_events.push(Event::PowerCellCollected { position: target });
                    }
                }
                TileKind::Gate => out_events.push(Event::GateReached { position: target }),
                TileKind::Empty | TileKind::Wall | TileKind::Ruins | TileKind::PlayerMarker => {}
            }
        }

        player.supplies = supplies.min(player.max_supplies);

        if fragment_collected && self.state.player.gate_fragments >= FRAGMENT_THRESHOLD {
            if is_exhausted(self.state.current_level) {
                out_events.push(Event::ProgressionExhausted {
                    fragments: self.state.player.gate_fragments,
                });
            } else {
                self.state.player.gate_fragments = 0;
                self.advance_progression(out_events);
            }
        }

        if self.state.player.supplies == 0 {
            self.state.game_over = true;
            warn!("supplies exhausted; mission failed");
            out_events.push(Event::SuppliesExhausted);
        }
    }

    fn validate_move(
        &self,
        direction: Direction,
        issued_at: Duration,
    ) -> Result<Position, MoveRejection> {
        if self.state.game_over {
            return Err(MoveRejection::SessionOver);
        }
        let world = self
            .state
            .active_world()
            .ok_or(MoveRejection::NoActiveWorld)?;
        if let Some(previous) = self.last_accepted_move {
            if issued_at.saturating_sub(previous) < self.config.move_cooldown {
                return Err(MoveRejection::Debounced);
            }
        }

        let target = self.state.player.position.step(direction);
        match world.grid.kind_at(target) {
            None => Err(MoveRejection::OutOfBounds),
            Some(kind) if !kind.is_passable() => Err(MoveRejection::Blocked),
            Some(_) => Ok(target),
        }
    }

    fn advance_progression(&mut self, out_events: &mut Vec<Event>) {
        let level = self.state.current_level + 1;
        let minted = generate_new_world(level, &mut self.rng);
        let destination = minted.address.id.clone();
        let name = minted.address.name.clone();

        out_events.push(Event::WorldGenerated {
            world: destination.clone(),
            biome: minted.world.biome,
        });
        let _ = self.state.worlds.insert(destination.clone(), minted.world);
        self.state.addresses.push(minted.address);
        self.state.current_level = level;
        info!("progression advanced to level {level}: {name} unlocked");
        out_events.push(Event::DestinationUnlocked {
            destination,
            name,
            level,
        });

        if level >= final_level() && self.state.terminal_address().is_none() {
            let terminal = terminal_address();
            info!("terminal destination {} revealed", terminal.name);
            out_events.push(Event::TerminalDestinationRevealed {
                destination: terminal.id.clone(),
                name: terminal.name.clone(),
            });
            self.state.addresses.push(terminal);
        }
    }

    fn travel(&mut self, destination: WorldId, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.validate_travel(&destination) {
            warn!("travel to {destination} rejected: {reason}");
            out_events.push(Event::TravelRejected {
                destination,
                reason,
            });
            return;
        }

        if !self.state.worlds.contains_key(&destination) {
            let Some(address) = self.state.address(&destination).cloned() else {
                return;
            };
            let world = generate_for_address(&address, self.state.current_level, &mut self.rng);
            out_events.push(Event::WorldGenerated {
                world: destination.clone(),
                biome: world.biome,
            });
            let _ = self.state.worlds.insert(destination.clone(), world);
        }

        let Some(world) = self.state.worlds.get_mut(&destination) else {
            return;
        };
        let arrival = world.gate_position;
        world.player_position = arrival;
        world.discovered = true;
        world.grid.reveal_around(arrival, DISCOVERY_RADIUS);
        let name = world.name.clone();
        let terminal = world.biome.is_terminal();

        if let Some(address) = self.state.address_mut(&destination) {
            address.discovered = true;
        }
        let from = self.state.current_world.replace(destination.clone());
        self.state.player.position = arrival;

        info!("traveled to {name}");
        out_events.push(Event::Traveled {
            from,
            to: destination,
            name: name.clone(),
        });

        if terminal {
            self.state.victory = true;
            self.state.game_over = true;
            info!("reached {name}; mission accomplished");
            out_events.push(Event::VictoryAchieved { name });
        }
    }

    fn validate_travel(&self, destination: &WorldId) -> Result<(), TravelError> {
        if self.state.game_over {
            return Err(TravelError::SessionOver);
        }
        let address = self
            .state
            .address(destination)
            .ok_or(TravelError::UnknownDestination)?;

        let active = self.state.active_world();
        if let Some(world) = active {
            if self.state.player.position != world.gate_position {
                return Err(TravelError::NotAtGate);
            }
            if &world.id == destination {
                return Err(TravelError::AlreadyThere);
            }
        }

        if address.is_eight_chevron {
            if !active.is_some_and(|world| world.biome.is_home()) {
                return Err(TravelError::TerminalRequiresHome);
            }
            if !self.state.player.has_power_cell {
                return Err(TravelError::TerminalRequiresPowerCell);
            }
        }

        Ok(())
    }

    fn inspect(&self, position: Position, out_events: &mut Vec<Event>) {
        let kind = self
            .state
            .active_world()
            .and_then(|world| world.grid.kind_at(position));
        out_events.push(Event::TileInspected { position, kind });
    }

    fn cheat(&mut self, code: CheatCode, out_events: &mut Vec<Event>) {
        let outcome = match code {
            CheatCode::AdvanceProgression => self.force_progression(out_events),
            CheatCode::GrantPowerCell => self.grant_power_cell(),
        };
        match outcome {
            Ok(()) => {
                info!("debug code `{}` applied", code.as_str());
                out_events.push(Event::CheatApplied { code });
            }
            Err(reason) => {
                warn!("debug code `{}` rejected: {reason}", code.as_str());
                out_events.push(Event::CheatRejected { code, reason });
            }
        }
    }

    fn force_progression(&mut self, out_events: &mut Vec<Event>) -> Result<(), CheatError> {
        if self.state.game_over {
            return Err(CheatError::SessionOver);
        }
        if is_exhausted(self.state.current_level) {
            return Err(CheatError::CatalogExhausted);
        }
        self.advance_progression(out_events);
        Ok(())
    }

    fn grant_power_cell(&mut self) -> Result<(), CheatError> {
        if self.state.game_over {
            return Err(CheatError::SessionOver);
        }
        if self.state.player.has_power_cell {
            return Err(CheatError::PowerCellAlreadyHeld);
        }
        self.state.player.has_power_cell = true;
        Ok(())
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.state = initial_state(&mut self.rng);
        self.last_accepted_move = None;
        info!("mission reset");
        out_events.push(Event::MissionStarted);
    }
}

/// Applies the provided command to the engine, mutating state deterministically.
pub fn apply(engine: &mut Engine, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move {
            direction,
            issued_at,
        } => engine.move_player(direction, issued_at, out_events),
        Command::Travel { destination } => engine.travel(destination, out_events),
        Command::Interact { position } => engine.inspect(position, out_events),
        Command::Cheat { code } => engine.cheat(code, out_events),
        Command::Reset => engine.reset(out_events),
    }
}

/// Query functions that provide read-only access to the engine state.
pub mod query {
    use gate_explorer_core::{GameState, GateAddress, Outcome, Player, World};

    use super::{Config, Engine, FRAGMENT_THRESHOLD};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(engine: &Engine) -> &'static str {
        engine.banner
    }

    /// Provides read-only access to the whole session aggregate.
    #[must_use]
    pub fn state(engine: &Engine) -> &GameState {
        &engine.state
    }

    /// World the player currently stands on.
    #[must_use]
    pub fn active_world(engine: &Engine) -> Option<&World> {
        engine.state.active_world()
    }

    /// Provides read-only access to the player record.
    #[must_use]
    pub fn player(engine: &Engine) -> &Player {
        &engine.state.player
    }

    /// Registered destinations in discovery order.
    #[must_use]
    pub fn addresses(engine: &Engine) -> &[GateAddress] {
        &engine.state.addresses
    }

    /// Configuration the engine was created with.
    #[must_use]
    pub fn config(engine: &Engine) -> &Config {
        &engine.config
    }

    /// Summarises the counters shown by the status panel.
    #[must_use]
    pub fn status(engine: &Engine) -> StatusSummary {
        let state = &engine.state;
        StatusSummary {
            world_name: state.active_world().map(|world| world.name.clone()),
            supplies: state.player.supplies,
            max_supplies: state.player.max_supplies,
            artifacts: state.player.artifacts.len(),
            fragments: state.player.gate_fragments,
            fragment_threshold: FRAGMENT_THRESHOLD,
            level: state.current_level,
            has_power_cell: state.player.has_power_cell,
            outcome: state.outcome(),
        }
    }

    /// Snapshot of the counters presented to the player.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct StatusSummary {
        /// Name of the active world, if any.
        pub world_name: Option<String>,
        /// Remaining supplies.
        pub supplies: u32,
        /// Supply capacity.
        pub max_supplies: u32,
        /// Number of artifacts collected.
        pub artifacts: usize,
        /// Fragments collected toward the next unlock.
        pub fragments: u32,
        /// Fragments required per unlock.
        pub fragment_threshold: u32,
        /// Progression level.
        pub level: u32,
        /// Whether the power cell is held.
        pub has_power_cell: bool,
        /// Phase of the session.
        pub outcome: Outcome,
    }
}

fn seeded_rng(config: Config) -> ChaCha8Rng {
    let seed = config.rng_seed().unwrap_or_else(rand::random);
    debug!("session rng seeded with {seed}");
    ChaCha8Rng::seed_from_u64(seed)
}

fn initial_state(rng: &mut ChaCha8Rng) -> GameState {
    let mut home = home_world(rng);
    let start = home.player_position;
    home.discovered = true;
    home.grid.reveal_around(start, DISCOVERY_RADIUS);

    let current = home.id.clone();
    let mut worlds = BTreeMap::new();
    let _ = worlds.insert(current.clone(), home);

    GameState {
        current_world: Some(current),
        worlds,
        player: Player::new(start, MAX_SUPPLIES),
        addresses: seed_addresses(),
        game_over: false,
        victory: false,
        current_level: STARTING_LEVEL,
    }
}

fn home_label(state: &GameState) -> &str {
    state
        .active_world()
        .map_or("an empty map", |world| world.name.as_str())
}
