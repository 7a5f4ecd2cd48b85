//! Validation outcome types.

use crate::errors::DecodeError;
use crate::protocol::models::LicensePayload;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome category of a license check.
///
/// Exactly one status is produced per validation; `valid` on the result is
/// true only for [`Active`](Self::Active) and [`GracePeriod`](Self::GracePeriod).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseStatus {
    /// No token supplied or stored.
    NoKey,
    /// Token is not in `QANUNI-<payload>-<checksum>` form.
    InvalidFormat,
    /// Checksum does not match the payload.
    InvalidChecksum,
    /// Payload could not be decoded.
    CorruptKey,
    /// Payload lacks a required field.
    IncompleteKey,
    /// Token is bound to another machine.
    WrongMachine,
    /// Past expiry and past the grace period.
    Expired,
    /// Past expiry but within the grace period.
    GracePeriod,
    /// Within the active period.
    Active,
    /// Unexpected internal failure.
    Error,
}

impl LicenseStatus {
    /// Wire name, e.g. `GRACE_PERIOD`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoKey => "NO_KEY",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidChecksum => "INVALID_CHECKSUM",
            Self::CorruptKey => "CORRUPT_KEY",
            Self::IncompleteKey => "INCOMPLETE_KEY",
            Self::WrongMachine => "WRONG_MACHINE",
            Self::Expired => "EXPIRED",
            Self::GracePeriod => "GRACE_PERIOD",
            Self::Active => "ACTIVE",
            Self::Error => "ERROR",
        }
    }

    /// Whether the application may run under this status.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active | Self::GracePeriod)
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DecodeError> for LicenseStatus {
    fn from(err: &DecodeError) -> Self {
        match err {
            DecodeError::InvalidFormat => Self::InvalidFormat,
            DecodeError::InvalidChecksum => Self::InvalidChecksum,
            DecodeError::CorruptKey(_) => Self::CorruptKey,
            DecodeError::IncompleteKey { .. } => Self::IncompleteKey,
        }
    }
}

/// Severity of a non-blocking expiry warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    /// Expiry within the notice window.
    Info,
    /// Expiry within a week.
    Warning,
    /// Expiry within a day, or in the grace period.
    Critical,
}

/// Payload plus the time calculations made against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDetails {
    /// Fingerprint the license is bound to.
    pub machine_id: String,
    /// End of the active period.
    pub expires_at: DateTime<Utc>,
    /// License type.
    #[serde(rename = "type")]
    pub license_type: String,
    /// Licensee name.
    pub issued_to: String,
    /// Issuance time, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// Whole days until `expires_at`, rounded up; zero or negative once expired.
    pub days_until_expiry: i64,
    /// `expires_at` plus the grace period.
    pub grace_period_end: DateTime<Utc>,
    /// Days left before lockout while in the grace period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_days_remaining: Option<i64>,
}

impl LicenseDetails {
    pub(crate) fn from_payload(
        payload: LicensePayload,
        days_until_expiry: i64,
        grace_period_end: DateTime<Utc>,
    ) -> Self {
        Self {
            machine_id: payload.machine_id,
            expires_at: payload.expires_at,
            license_type: payload.license_type,
            issued_to: payload.issued_to,
            issued_at: payload.issued_at,
            days_until_expiry,
            grace_period_end,
            grace_days_remaining: None,
        }
    }
}

/// Both fingerprints involved in a binding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineMismatch {
    /// Fingerprint named in the token.
    pub licensed_machine_id: String,
    /// Fingerprint of this machine.
    pub current_machine_id: String,
}

/// Extra data attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ValidationDetails {
    /// A structurally valid license and its timing.
    License(LicenseDetails),
    /// The license is bound elsewhere.
    MachineMismatch(MachineMismatch),
}

impl ValidationDetails {
    /// The license details, if this is not a binding failure.
    pub fn license(&self) -> Option<&LicenseDetails> {
        match self {
            Self::License(details) => Some(details),
            Self::MachineMismatch(_) => None,
        }
    }
}

/// Result of validating a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the application may run.
    pub valid: bool,
    /// Outcome category.
    pub status: LicenseStatus,
    /// Blocking reason, set when `valid` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-blocking notice to show in a banner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Severity of `warning`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_level: Option<WarningLevel>,
    /// Payload and diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationDetails>,
}

impl ValidationResult {
    /// A result carrying an error message. `valid` follows the status.
    pub fn rejected(status: LicenseStatus, error: impl Into<String>) -> Self {
        Self {
            valid: status.is_usable(),
            status,
            error: Some(error.into()),
            warning: None,
            warning_level: None,
            details: None,
        }
    }

    /// An `ERROR` result for an unexpected failure.
    pub fn internal_error(error: impl Into<String>) -> Self {
        Self::rejected(LicenseStatus::Error, error)
    }

    /// A usable result.
    pub(crate) fn usable(status: LicenseStatus, details: LicenseDetails) -> Self {
        Self {
            valid: status.is_usable(),
            status,
            error: None,
            warning: None,
            warning_level: None,
            details: Some(ValidationDetails::License(details)),
        }
    }

    pub(crate) fn with_warning(mut self, level: WarningLevel, message: String) -> Self {
        self.warning = Some(message);
        self.warning_level = Some(level);
        self
    }

    pub(crate) fn with_details(mut self, details: ValidationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// License details, if the token decoded and matched this machine.
    pub fn license_details(&self) -> Option<&LicenseDetails> {
        self.details.as_ref().and_then(ValidationDetails::license)
    }
}
