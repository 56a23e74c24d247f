#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Gate Explorer mission in the terminal.

mod config;
mod input;

use std::{
    io::{self, BufRead, Write},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use gate_explorer_core::{Command, Event, StateStore, WorldId};
use gate_explorer_engine::{query, Session};
use gate_explorer_persistence::{decode_state, encode_state, JsonFileStore};
use gate_explorer_rendering::{Frame, RenderingBackend, TextBackend};
use log::{info, warn};

use config::{CliArgs, Settings};
use input::{Intent, HELP};

/// Entry point for the Gate Explorer command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::resolve(CliArgs::parse())?;
    let mut store = JsonFileStore::new(&settings.save_path);
    if settings.fresh {
        store
            .clear()
            .with_context(|| format!("could not discard {}", settings.save_path.display()))?;
    }

    let mut events = Vec::new();
    let mut session = Session::open(settings.engine, store, &mut events)
        .with_context(|| format!("could not open {}", settings.save_path.display()))?;
    info!("session stored at {}", settings.save_path.display());

    let mut backend = TextBackend::new(io::stdout());
    println!("{}", query::welcome_banner(session.engine()));
    println!("Type `help` for the list of commands.");
    backend.present(&Frame::capture(session.engine(), &events))?;

    let started = Instant::now();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("could not read from standard input")?;
        let intent = match input::parse(&line) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        events.clear();
        let command = match intent {
            Intent::Quit => break,
            Intent::Help => {
                println!("{HELP}");
                continue;
            }
            Intent::Status => {
                backend.present(&Frame::capture(session.engine(), &[]))?;
                continue;
            }
            Intent::Export => {
                println!("{}", encode_state(query::state(session.engine()))?);
                continue;
            }
            Intent::Import(code) => {
                match decode_state(&code) {
                    Ok(state) => {
                        session.replace_state(state)?;
                        println!("Session imported.");
                        backend.present(&Frame::capture(session.engine(), &[]))?;
                    }
                    Err(error) => {
                        warn!("rejected transfer code: {error}");
                        println!("{error}");
                    }
                }
                continue;
            }
            Intent::Move(direction) => Command::Move {
                direction,
                issued_at: started.elapsed(),
            },
            Intent::Interact => Command::Interact {
                position: query::player(session.engine()).position,
            },
            Intent::Dial(target) => Command::Travel {
                destination: resolve_destination(&session, &target),
            },
            Intent::Cheat(code) => Command::Cheat { code },
            Intent::Reset => Command::Reset,
        };

        session.dispatch(command, &mut events)?;
        report(&mut backend, &session, &events)?;
    }

    io::stdout().flush()?;
    Ok(())
}

/// Redraws the map after moves and travel; other commands only print their notices.
fn report<S>(
    backend: &mut TextBackend<io::Stdout>,
    session: &Session<S>,
    events: &[Event],
) -> Result<()>
where
    S: StateStore,
{
    let redraw = events.iter().any(|event| {
        matches!(
            event,
            Event::PlayerMoved { .. }
                | Event::Traveled { .. }
                | Event::MissionStarted
                | Event::SuppliesExhausted
        )
    });
    if redraw {
        return backend.present(&Frame::capture(session.engine(), events));
    }
    for notice in events.iter().filter_map(Event::notice) {
        println!("{}", notice.message);
    }
    Ok(())
}

/// Accepts either a 1-based position in the address list or a raw identifier.
fn resolve_destination<S>(session: &Session<S>, target: &str) -> WorldId
where
    S: StateStore,
{
    let addresses = query::addresses(session.engine());
    target
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| addresses.get(index))
        .map_or_else(|| WorldId::new(target), |address| address.id.clone())
}
