use std::{
    fs, io,
    path::{Path, PathBuf},
};

use gate_explorer_core::{GameState, StateStore};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{check_consistency, Inconsistency};

/// Version written into every save envelope.
pub const SAVE_VERSION: u32 = 1;

/// Errors raised while reading or writing a save file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file system refused an operation.
    #[error("could not access save file {path}: {source}")]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The save file is not valid JSON of the expected shape.
    #[error("save file {path} is malformed: {source}")]
    Malformed {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The session could not be serialised.
    #[error("could not serialise the session: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The save file was written by an incompatible version.
    #[error("save file version {found} is not supported (expected {})", SAVE_VERSION)]
    UnsupportedVersion {
        /// Version stored in the file.
        found: u32,
    },
    /// The stored session violates an aggregate invariant.
    #[error("save file holds an inconsistent session: {0}")]
    Inconsistent(#[from] Inconsistency),
}

/// Persists a single session as pretty-printed JSON.
///
/// Writes go through a sibling temporary file that is renamed into place, so
/// an interrupted save never truncates the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the provided path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    state: GameState,
}

impl StateStore for JsonFileStore {
    type Error = StoreError;

    fn load(&mut self) -> Result<Option<GameState>, Self::Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no save file at {}", self.path.display());
                return Ok(None);
            }
            Err(error) => return Err(self.io_error(error)),
        };

        let malformed = |source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        };
        let header: VersionHeader = serde_json::from_slice(&bytes).map_err(malformed)?;
        if header.version != SAVE_VERSION {
            warn!(
                "refusing save file {} with version {}",
                self.path.display(),
                header.version
            );
            return Err(StoreError::UnsupportedVersion {
                found: header.version,
            });
        }

        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(malformed)?;
        check_consistency(&envelope.state)?;
        Ok(Some(envelope.state))
    }

    fn save(&mut self, state: &GameState) -> Result<(), Self::Error> {
        let envelope = EnvelopeRef {
            version: SAVE_VERSION,
            state,
        };
        let json = serde_json::to_vec_pretty(&envelope).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
            }
        }
        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|error| self.io_error(error))?;
        fs::rename(&staging, &self.path).map_err(|error| self.io_error(error))
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}
