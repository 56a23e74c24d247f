#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Gate Explorer adapters.
//!
//! A [`Frame`] is a plain snapshot of everything a front end shows: the
//! active world with fog of war applied, the status counters, the destination
//! registry and the notices raised by the last command. Backends only ever
//! see frames, never the engine itself.

use std::{fmt, io::Write};

use anyhow::Result as AnyResult;
use gate_explorer_core::{Event, GateAddress, Notice, Outcome, Severity, Tile, TileKind, World};
use gate_explorer_engine::{
    query::{self, StatusSummary},
    Engine,
};

/// Glyph drawn for tiles that have not been discovered yet.
pub const FOG_GLYPH: char = '░';

/// Glyph drawn at the player's position.
pub const PLAYER_GLYPH: char = '@';

/// Glyph used to draw a discovered tile.
#[must_use]
pub const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '.',
        TileKind::Wall => '#',
        TileKind::Ruins => 'R',
        TileKind::Hazard => '!',
        TileKind::Enemy => 'E',
        TileKind::Artifact => 'A',
        TileKind::Gate => 'O',
        TileKind::GateFragment => 'F',
        TileKind::Supplies => '+',
        TileKind::PowerCell => 'Z',
        TileKind::PlayerMarker => PLAYER_GLYPH,
    }
}

/// Rows of glyphs describing the visible part of a world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldView {
    /// Display name of the world.
    pub title: String,
    /// One string per grid row, top to bottom.
    pub rows: Vec<String>,
}

impl WorldView {
    /// Draws the world with fog of war and the player marker overlaid.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let rows = world
            .grid
            .rows()
            .map(|row| {
                row.iter()
                    .map(|tile| tile_glyph(tile, world))
                    .collect::<String>()
            })
            .collect();
        Self {
            title: world.name.clone(),
            rows,
        }
    }
}

fn tile_glyph(tile: &Tile, world: &World) -> char {
    if tile.position == world.player_position {
        PLAYER_GLYPH
    } else if tile.discovered {
        glyph(tile.kind)
    } else {
        FOG_GLYPH
    }
}

/// How a destination relates to the player's journey.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestinationStatus {
    /// The player is on this world.
    Current,
    /// The world has been visited before.
    Visited,
    /// The world has never been visited.
    Unvisited,
}

/// Entry of the dialing panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationEntry {
    /// Identifier passed back when dialing.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Symbols shown on the dial.
    pub symbols: String,
    /// Relationship with the player's journey.
    pub status: DestinationStatus,
    /// Whether this is the eight-chevron destination.
    pub eight_chevron: bool,
}

impl DestinationEntry {
    fn capture(address: &GateAddress, current: Option<&str>) -> Self {
        let status = if current == Some(address.id.as_str()) {
            DestinationStatus::Current
        } else if address.discovered {
            DestinationStatus::Visited
        } else {
            DestinationStatus::Unvisited
        };
        Self {
            id: address.id.as_str().to_owned(),
            name: address.name.clone(),
            symbols: address.symbols.join(" "),
            status,
            eight_chevron: address.is_eight_chevron,
        }
    }
}

/// Complete snapshot presented by a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Active world, when there is one.
    pub world: Option<WorldView>,
    /// Status counters.
    pub status: StatusSummary,
    /// Dialable destinations in registry order.
    pub destinations: Vec<DestinationEntry>,
    /// Notices raised by the most recent command.
    pub notices: Vec<Notice>,
}

impl Frame {
    /// Captures the engine state along with the notices of `events`.
    #[must_use]
    pub fn capture(engine: &Engine, events: &[Event]) -> Self {
        let state = query::state(engine);
        let current = state.current_world.as_ref().map(|id| id.as_str());
        Self {
            world: query::active_world(engine).map(WorldView::capture),
            status: query::status(engine),
            destinations: query::addresses(engine)
                .iter()
                .map(|address| DestinationEntry::capture(address, current))
                .collect(),
            notices: events.iter().filter_map(Event::notice).collect(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.world {
            Some(world) => {
                writeln!(f, "== {} ==", world.title)?;
                for row in &world.rows {
                    writeln!(f, "{row}")?;
                }
            }
            None => writeln!(f, "== no active world ==")?,
        }

        let status = &self.status;
        writeln!(
            f,
            "Supplies {}/{} | Artifacts {} | Fragments {}/{} | Level {} | Power cell: {}",
            status.supplies,
            status.max_supplies,
            status.artifacts,
            status.fragments,
            status.fragment_threshold,
            status.level,
            if status.has_power_cell { "yes" } else { "no" },
        )?;
        match status.outcome {
            Outcome::Exploring => {}
            Outcome::Failed => writeln!(f, "*** MISSION FAILED - type `reset` to start over ***")?,
            Outcome::Victorious => {
                writeln!(f, "*** MISSION ACCOMPLISHED - type `reset` to play again ***")?;
            }
        }

        writeln!(f, "Gate addresses:")?;
        for (index, entry) in self.destinations.iter().enumerate() {
            let tag = match entry.status {
                DestinationStatus::Current => "here",
                DestinationStatus::Visited => "visited",
                DestinationStatus::Unvisited => "new",
            };
            let chevrons = if entry.eight_chevron { " [8]" } else { "" };
            writeln!(
                f,
                "  {}. {} ({tag}){chevrons}  {}  [{}]",
                index + 1,
                entry.name,
                entry.symbols,
                entry.id
            )?;
        }

        for notice in &self.notices {
            writeln!(f, "{} {}", severity_marker(notice.severity), notice.message)?;
        }
        Ok(())
    }
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[i]",
        Severity::Success => "[+]",
        Severity::Error => "[!]",
    }
}

/// Rendering backend capable of presenting Gate Explorer frames.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Backend that prints frames as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
}

impl<W> TextBackend<W>
where
    W: Write,
{
    /// Creates a backend writing to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Releases the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W> RenderingBackend for TextBackend<W>
where
    W: Write,
{
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        write!(self.out, "{frame}")?;
        self.out.flush()?;
        Ok(())
    }
}
