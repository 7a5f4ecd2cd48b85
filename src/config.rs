//! Shared license constants.
//!
//! The issuer and this validator must agree bit-for-bit on the salt, the
//! grace period and the warning thresholds. Changing any of them invalidates
//! every token already in the field.

use crate::errors::LicenseError;

/// Salt mixed into the token checksum and the machine fingerprint.
///
/// SECURITY: this is a symmetric secret shipped inside the binary. It detects
/// tampering and transcription errors; it does not stop a determined forger.
pub const DEFAULT_SALT: &str = "QANUNI_LEGAL_2024_SECURE_SALT_v1";

/// Days a license keeps working after `expiresAt`.
pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 7;

/// Days before expiry at which an informational notice starts.
pub const DEFAULT_NOTICE_DAYS: i64 = 30;

/// Days before expiry at which the notice becomes a warning.
pub const DEFAULT_URGENT_DAYS: i64 = 7;

/// Days before expiry at which the notice becomes critical.
pub const DEFAULT_CRITICAL_DAYS: i64 = 1;

/// Configuration for Qanuni license validation.
#[derive(Debug, Clone)]
pub struct LicenseConfig {
    /// Secret salt shared with the issuer.
    pub salt: &'static str,

    /// Grace window after expiry, in days.
    pub grace_period_days: i64,

    /// Remaining days at or below which an `info` notice is attached.
    pub notice_days: i64,

    /// Remaining days at or below which the notice is a `warning`.
    pub urgent_days: i64,

    /// Remaining days at or below which the notice is `critical`.
    pub critical_days: i64,

    /// Directory name under the per-user config dir holding `license.key`.
    pub store_namespace: &'static str,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT,
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            notice_days: DEFAULT_NOTICE_DAYS,
            urgent_days: DEFAULT_URGENT_DAYS,
            critical_days: DEFAULT_CRITICAL_DAYS,
            store_namespace: "qanuni",
        }
    }
}

impl LicenseConfig {
    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), LicenseError> {
        if self.salt.is_empty() {
            return Err(LicenseError::ConfigError(
                "salt cannot be empty".to_string(),
            ));
        }
        if self.store_namespace.is_empty() {
            return Err(LicenseError::ConfigError(
                "store_namespace cannot be empty".to_string(),
            ));
        }
        if self.grace_period_days < 0 {
            return Err(LicenseError::ConfigError(format!(
                "grace_period_days cannot be negative, got {}",
                self.grace_period_days
            )));
        }
        if !(0 <= self.critical_days
            && self.critical_days <= self.urgent_days
            && self.urgent_days <= self.notice_days)
        {
            return Err(LicenseError::ConfigError(format!(
                "warning thresholds must satisfy 0 <= critical ({}) <= urgent ({}) <= notice ({})",
                self.critical_days, self.urgent_days, self.notice_days
            )));
        }
        Ok(())
    }
}
