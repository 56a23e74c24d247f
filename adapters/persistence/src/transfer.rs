use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gate_explorer_core::GameState;

use crate::{check_consistency, Inconsistency};

const TRANSFER_DOMAIN: &str = "gate";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded session payload.
pub const TRANSFER_HEADER: &str = "gate:v1";

/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while encoding or decoding transfer strings.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("transfer code was empty")]
    EmptyPayload,
    /// The encoded session did not contain a version segment.
    #[error("transfer code is missing the version")]
    MissingVersion,
    /// The encoded session did not include the payload segment.
    #[error("transfer code is missing the payload")]
    MissingPayload,
    /// The encoded session used an unexpected prefix segment.
    #[error("transfer prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded session used an unsupported version identifier.
    #[error("transfer version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode transfer payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse transfer payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The session could not be serialised.
    #[error("could not serialise the session: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The decoded session violates an aggregate invariant.
    #[error("transfer code holds an inconsistent session: {0}")]
    Inconsistent(#[from] Inconsistency),
}

/// Encodes the session into a single-line string suitable for clipboard transfer.
pub fn encode_state(state: &GameState) -> Result<String, TransferError> {
    let json = serde_json::to_vec(state).map_err(TransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{TRANSFER_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a session from the provided string representation.
pub fn decode_state(value: &str) -> Result<GameState, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().unwrap_or_default();
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TransferError::InvalidEncoding)?;
    let state: GameState =
        serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;
    check_consistency(&state)?;
    Ok(state)
}
