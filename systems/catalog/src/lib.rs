#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progression catalog and seed destinations.
//!
//! Destinations beyond the seeds are minted from an ordered list of templates,
//! one per level starting at level 2. Minting the final template also reveals
//! the terminal destination, which is the only eight-symbol address.

use gate_explorer_core::{Biome, GateAddress, World, WorldId};
use gate_explorer_system_generation::generate_world;
use log::info;
use rand::Rng;

/// Level of the home world and of a fresh session.
pub const STARTING_LEVEL: u32 = 1;

/// Identifier of the home world.
pub const HOME_ID: &str = "earth";

/// Display name of the home world.
pub const HOME_NAME: &str = "Earth (P3X-774)";

const HOME_SYMBOLS: [&str; 6] = ["🌍", "🌊", "🌱", "🌤️", "🏔️", "🌋"];

/// Identifier of the outpost that is dialable from the first turn.
pub const OUTPOST_ID: &str = "abydos";

/// Display name of the seed outpost.
pub const OUTPOST_NAME: &str = "Abydos (P8X-873)";

const OUTPOST_SYMBOLS: [&str; 6] = ["🏜️", "🔺", "☀️", "💀", "🏛️", "⚱️"];

/// Identifier of the terminal destination.
pub const TERMINAL_ID: &str = "atlantis";

/// Display name of the terminal destination.
pub const TERMINAL_NAME: &str = "Atlantis";

const TERMINAL_SYMBOLS: [&str; 8] = ["🏛️", "🌊", "🔱", "💎", "🌀", "⭐", "🐚", "🌌"];

/// Blueprint of a catalog destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestinationTemplate {
    /// Biome used to generate the world.
    pub biome: Biome,
    /// Canonical name, suffixed with a gate code when minted.
    pub name: &'static str,
    /// Symbols shown by the dialing interface.
    pub symbols: [&'static str; 6],
}

/// Ordered catalog; the entry for level `n` sits at index `n - 2`.
pub const TEMPLATES: [DestinationTemplate; 4] = [
    DestinationTemplate {
        biome: Biome::Jungle,
        name: "Chulak",
        symbols: ["🌿", "🐍", "🦋", "🌺", "🌳", "💧"],
    },
    DestinationTemplate {
        biome: Biome::Arctic,
        name: "Kallana",
        symbols: ["❄️", "🐧", "⛄", "🧊", "🌨️", "🏔️"],
    },
    DestinationTemplate {
        biome: Biome::Volcanic,
        name: "Aschen",
        symbols: ["🌋", "🔥", "💀", "⚡", "🌪️", "🗿"],
    },
    DestinationTemplate {
        biome: Biome::AlienCity,
        name: "Celestis",
        symbols: ["🏛️", "👽", "🛸", "🔮", "⚡", "🌌"],
    },
];

/// A freshly minted destination together with its generated world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintedDestination {
    /// Generated world.
    pub world: World,
    /// Registry entry reaching the world.
    pub address: GateAddress,
}

/// Template used for the destination minted at `level`.
///
/// Levels past the end of the catalog reuse the final template.
#[must_use]
pub fn template_for(level: u32) -> &'static DestinationTemplate {
    let index = usize::try_from(level.saturating_sub(2)).unwrap_or(usize::MAX);
    &TEMPLATES[index.min(TEMPLATES.len() - 1)]
}

/// Level at which the final catalog template is minted.
#[must_use]
pub const fn final_level() -> u32 {
    TEMPLATES.len() as u32 + 1
}

/// Reports whether every catalog template has already been minted for a session at `current_level`.
#[must_use]
pub const fn is_exhausted(current_level: u32) -> bool {
    current_level >= final_level()
}

/// Draws a gate code of the form `P<digit><letter>-<three digits>`.
pub fn gate_code<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let digit = char::from(b'0' + rng.gen_range(0..10u8));
    let letter = char::from(b'A' + rng.gen_range(0..26u8));
    let suffix = rng.gen_range(0..1000u16);
    format!("P{digit}{letter}-{suffix:03}")
}

/// Mints the catalog destination for `level`, generating its world.
///
/// The address starts undiscovered; it is dialable as soon as it is
/// registered.
pub fn generate_new_world<R>(level: u32, rng: &mut R) -> MintedDestination
where
    R: Rng + ?Sized,
{
    let template = template_for(level);
    let id = WorldId::new(format!("world-{level}"));
    let name = format!("{} ({})", template.name, gate_code(rng));
    let world = generate_world(id.clone(), name.clone(), template.biome, level, rng);

    info!("minted destination {name} at level {level}");

    MintedDestination {
        address: GateAddress {
            id,
            name,
            biome: template.biome,
            symbols: owned(&template.symbols),
            discovered: false,
            is_eight_chevron: false,
        },
        world,
    }
}

/// Generates the home world.
pub fn home_world<R>(rng: &mut R) -> World
where
    R: Rng + ?Sized,
{
    generate_world(
        WorldId::new(HOME_ID),
        HOME_NAME,
        Biome::Earth,
        STARTING_LEVEL,
        rng,
    )
}

/// Destinations registered in a fresh session: the home world, already
/// discovered, followed by the seed outpost.
#[must_use]
pub fn seed_addresses() -> Vec<GateAddress> {
    vec![
        GateAddress {
            id: WorldId::new(HOME_ID),
            name: HOME_NAME.to_owned(),
            biome: Biome::Earth,
            symbols: owned(&HOME_SYMBOLS),
            discovered: true,
            is_eight_chevron: false,
        },
        GateAddress {
            id: WorldId::new(OUTPOST_ID),
            name: OUTPOST_NAME.to_owned(),
            biome: Biome::Desert,
            symbols: owned(&OUTPOST_SYMBOLS),
            discovered: false,
            is_eight_chevron: false,
        },
    ]
}

/// Registry entry of the terminal destination.
#[must_use]
pub fn terminal_address() -> GateAddress {
    GateAddress {
        id: WorldId::new(TERMINAL_ID),
        name: TERMINAL_NAME.to_owned(),
        biome: Biome::Atlantis,
        symbols: owned(&TERMINAL_SYMBOLS),
        discovered: false,
        is_eight_chevron: true,
    }
}

/// Generates the world behind a registered address that has no world yet.
pub fn generate_for_address<R>(address: &GateAddress, level: u32, rng: &mut R) -> World
where
    R: Rng + ?Sized,
{
    generate_world(
        address.id.clone(),
        address.name.clone(),
        address.biome,
        level,
        rng,
    )
}

fn owned(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|symbol| (*symbol).to_owned()).collect()
}
