//! License token codec.
//!
//! Token grammar:
//!
//! ```text
//! QANUNI-<base64(json payload)>-<8 uppercase hex checksum>
//! ```
//!
//! Decoding verifies the checksum *before* the payload is base64-decoded or
//! parsed, so a tampered payload is never processed.

use crate::crypto::digest::verify_checksum;
use crate::errors::DecodeError;
use crate::protocol::models::{
    parse_timestamp, LicensePayload, WirePayload, DEFAULT_ISSUED_TO, DEFAULT_LICENSE_TYPE,
};
use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurpose, DecodePaddingMode, GeneralPurposeConfig},
    Engine,
};
use tracing::debug;

/// Literal prefix of every token.
pub const TOKEN_PREFIX: &str = "QANUNI-";

/// Standard alphabet; padding optional on decode since keys get retyped by hand.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A token whose checksum verified and whose payload parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    /// The decoded payload.
    pub payload: LicensePayload,
    /// The verified checksum segment.
    pub checksum: String,
}

/// Strip surrounding whitespace and byte-order marks picked up when a key
/// is pasted from, or saved into, a text file.
pub fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Decode and integrity-check a token.
///
/// # Errors
/// * `InvalidFormat` - missing `QANUNI-` prefix or checksum separator
/// * `InvalidChecksum` - checksum does not match the payload segment
/// * `CorruptKey` - payload is not base64 JSON, or `expiresAt` is not a date-time
/// * `IncompleteKey` - `machineId` or `expiresAt` missing or empty
pub fn decode(token: &str, salt: &str) -> Result<DecodedToken, DecodeError> {
    let token = clean_token(token);

    let body = token.strip_prefix(TOKEN_PREFIX).ok_or_else(|| {
        debug!("token rejected: missing prefix");
        DecodeError::InvalidFormat
    })?;

    // Split on the last separator; the checksum never contains '-'.
    let (payload_segment, checksum) = body.rsplit_once('-').ok_or_else(|| {
        debug!("token rejected: no checksum separator");
        DecodeError::InvalidFormat
    })?;

    if !verify_checksum(payload_segment, checksum, salt) {
        debug!("token rejected: checksum mismatch");
        return Err(DecodeError::InvalidChecksum);
    }

    let bytes = PAYLOAD_ENGINE
        .decode(payload_segment)
        .map_err(|e| DecodeError::CorruptKey(format!("invalid base64: {}", e)))?;

    let wire: WirePayload = serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::CorruptKey(format!("invalid payload: {}", e)))?;

    let payload = payload_from_wire(wire)?;

    Ok(DecodedToken {
        payload,
        checksum: checksum.to_string(),
    })
}

fn payload_from_wire(wire: WirePayload) -> Result<LicensePayload, DecodeError> {
    let machine_id = required(wire.machine_id, "machineId")?;
    let expires_raw = required(wire.expires_at, "expiresAt")?;

    let expires_at = parse_timestamp(&expires_raw).ok_or_else(|| {
        DecodeError::CorruptKey(format!("expiresAt is not a date-time: {}", expires_raw))
    })?;

    let issued_at = wire.issued_at.as_deref().and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            debug!(issued_at = raw, "ignoring unparseable issuedAt");
        }
        parsed
    });

    Ok(LicensePayload {
        machine_id,
        expires_at,
        license_type: non_empty(wire.license_type)
            .unwrap_or_else(|| DEFAULT_LICENSE_TYPE.to_string()),
        issued_to: non_empty(wire.issued_to).unwrap_or_else(|| DEFAULT_ISSUED_TO.to_string()),
        issued_at,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DecodeError> {
    non_empty(value).ok_or_else(|| {
        debug!(field, "token rejected: required field missing");
        DecodeError::IncompleteKey { field }
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Encode a payload into a token.
///
/// Issuance belongs to the issuer tooling; this exists so tests can build
/// tokens with the same constants the validator uses.
#[cfg(any(test, feature = "test-seams"))]
pub fn encode(payload: &LicensePayload, salt: &str) -> String {
    let json = serde_json::to_vec(&payload.to_wire()).expect("payload serializes");
    encode_raw(&json, salt)
}

/// Encode arbitrary payload bytes into a token with a valid checksum.
#[cfg(any(test, feature = "test-seams"))]
pub fn encode_raw(payload_bytes: &[u8], salt: &str) -> String {
    let segment = PAYLOAD_ENGINE.encode(payload_bytes);
    let checksum = crate::crypto::digest::token_checksum(&segment, salt);
    format!("{}{}-{}", TOKEN_PREFIX, segment, checksum)
}
