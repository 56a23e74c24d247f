//! Command-line flags and the optional TOML settings file.
//!
//! Flags override the file, and the file overrides built-in defaults. Every
//! key in the file is optional.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use gate_explorer_engine::{Config, DEFAULT_MOVE_COOLDOWN};
use serde::Deserialize;

/// Save file used when neither the flags nor the settings file name one.
pub(crate) const DEFAULT_SAVE_PATH: &str = "gate-explorer-save.json";

/// Explore procedurally generated worlds through an ancient gate network.
#[derive(Debug, Parser)]
#[command(name = "gate-explorer", version)]
pub(crate) struct CliArgs {
    /// Path of a TOML settings file.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Seed for world generation; reuse it to replay a session.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Path of the save file.
    #[arg(long, value_name = "PATH")]
    pub(crate) save: Option<PathBuf>,
    /// Ignore any existing save and start a new mission.
    #[arg(long)]
    pub(crate) fresh: bool,
}

/// Fully resolved runtime settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) engine: Config,
    pub(crate) save_path: PathBuf,
    pub(crate) fresh: bool,
}

impl Settings {
    /// Merges the flags with the settings file they point at.
    pub(crate) fn resolve(args: CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("could not read settings file {}", path.display()))?;
                parse_settings(&text)
                    .with_context(|| format!("invalid settings file {}", path.display()))?
            }
            None => TomlSettings::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: CliArgs, file: TomlSettings) -> Self {
        let seed = args.seed.or(file.engine.seed);
        let cooldown = Duration::from_millis(file.engine.move_cooldown_ms);
        let save_path = args
            .save
            .or(file.storage.save_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));
        Self {
            engine: Config::new(cooldown, seed),
            save_path,
            fresh: args.fresh,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    #[serde(default)]
    engine: TomlEngine,
    #[serde(default)]
    storage: TomlStorage,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlEngine {
    #[serde(default = "default_move_cooldown_ms")]
    move_cooldown_ms: u64,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlStorage {
    #[serde(default)]
    save_path: Option<PathBuf>,
}

fn default_move_cooldown_ms() -> u64 {
    u64::try_from(DEFAULT_MOVE_COOLDOWN.as_millis()).unwrap_or(u64::MAX)
}

impl Default for TomlEngine {
    fn default() -> Self {
        Self {
            move_cooldown_ms: default_move_cooldown_ms(),
            seed: None,
        }
    }
}

fn parse_settings(text: &str) -> Result<TomlSettings, toml::de::Error> {
    toml::from_str(text)
}
