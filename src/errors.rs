//! Qanuni license error types.

use thiserror::Error;

/// Reasons a token string fails to decode.
///
/// Each variant corresponds to exactly one terminal
/// [`LicenseStatus`](crate::policy::LicenseStatus).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Token does not start with the `QANUNI-` prefix or has no checksum segment.
    #[error("Invalid license key format")]
    InvalidFormat,

    /// Checksum does not match the payload segment (tampered or mistyped key).
    #[error("License key checksum mismatch")]
    InvalidChecksum,

    /// Payload segment is not valid base64-encoded JSON.
    #[error("License key is corrupt: {0}")]
    CorruptKey(String),

    /// Payload decoded but a required field is missing or empty.
    #[error("License key is incomplete: missing {field}")]
    IncompleteKey {
        /// Name of the missing payload field.
        field: &'static str,
    },
}

/// Errors from configuration, persistence and machine identity.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The per-user configuration directory could not be determined.
    #[error("Could not find user configuration directory")]
    ConfigDirUnavailable,

    /// License store I/O error.
    #[error("License store I/O error: {0}")]
    StoreIO(String),

    /// Local machine attributes could not be read.
    #[error("Machine identity error: {0}")]
    MachineIdentity(String),
}
