//! License validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. Token present
//! 2. Token decodes and its checksum verifies
//! 3. Token is bound to this machine
//! 4. Token age: active, grace period, or expired
//!
//! All day counts round up so a partial day never under-reports the time
//! a user has left.

use crate::machine::ERROR_FINGERPRINT;
use crate::policy::context::LicenseContext;
use crate::policy::status::{
    LicenseDetails, LicenseStatus, MachineMismatch, ValidationDetails, ValidationResult,
    WarningLevel,
};
use crate::protocol::codec::{clean_token, decode};
use crate::protocol::models::LicensePayload;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days in `duration`, rounded toward positive infinity.
pub fn ceil_days(duration: Duration) -> i64 {
    let millis = duration.num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Validates tokens against the injected clock and machine identity.
#[derive(Debug, Clone)]
pub struct LicenseValidator {
    context: LicenseContext,
}

impl LicenseValidator {
    /// Create a validator over the given context.
    pub fn new(context: LicenseContext) -> Self {
        Self { context }
    }

    /// The injected context.
    pub fn context(&self) -> &LicenseContext {
        &self.context
    }

    /// Fingerprint of the machine this validator runs on.
    pub fn current_machine_id(&self) -> String {
        self.context.machine.machine_id()
    }

    /// Validate a token.
    ///
    /// `current_machine_id` overrides the context's provider, so a caller
    /// that has already computed the fingerprint does not compute it twice.
    /// Always returns a result; failures are expressed through `status`.
    pub fn validate(
        &self,
        token: Option<&str>,
        current_machine_id: Option<&str>,
    ) -> ValidationResult {
        let token = match token.map(clean_token) {
            Some(t) if !t.is_empty() => t,
            _ => {
                return ValidationResult::rejected(
                    LicenseStatus::NoKey,
                    "No license key found. Please activate the application.",
                )
            }
        };

        let decoded = match decode(token, self.context.config.salt) {
            Ok(decoded) => decoded,
            Err(e) => {
                let status = LicenseStatus::from(&e);
                debug!(%status, "license rejected");
                return ValidationResult::rejected(status, e.to_string());
            }
        };

        let current = current_machine_id
            .map(str::to_string)
            .unwrap_or_else(|| self.current_machine_id());

        // The error sentinel is shared by every machine that fails to fingerprint.
        if decoded.payload.machine_id != current || current == ERROR_FINGERPRINT {
            debug!(
                licensed = %decoded.payload.machine_id,
                current = %current,
                "license bound to another machine"
            );
            return ValidationResult::rejected(
                LicenseStatus::WrongMachine,
                "This license is registered to a different machine.",
            )
            .with_details(ValidationDetails::MachineMismatch(MachineMismatch {
                licensed_machine_id: decoded.payload.machine_id,
                current_machine_id: current,
            }));
        }

        self.check_expiry(decoded.payload, self.context.clock.now_utc())
    }

    fn check_expiry(&self, payload: LicensePayload, now: DateTime<Utc>) -> ValidationResult {
        let config = &self.context.config;
        let expires_at = payload.expires_at;

        let Some(grace) = Duration::try_days(config.grace_period_days) else {
            return ValidationResult::internal_error(format!(
                "Grace period of {} days is out of range",
                config.grace_period_days
            ));
        };
        let Some(grace_period_end) = expires_at.checked_add_signed(grace) else {
            return ValidationResult::internal_error(format!(
                "License expiry {} is out of range",
                expires_at
            ));
        };

        let days_until_expiry = ceil_days(expires_at - now);
        let expiry_date = expires_at.format("%Y-%m-%d");
        let mut details =
            LicenseDetails::from_payload(payload, days_until_expiry, grace_period_end);

        if now > grace_period_end {
            debug!(%expires_at, "license expired past grace period");
            return ValidationResult::rejected(
                LicenseStatus::Expired,
                format!(
                    "License expired on {} and the {}-day grace period has ended. Please renew your license.",
                    expiry_date, config.grace_period_days
                ),
            )
            .with_details(ValidationDetails::License(details));
        }

        if now > expires_at {
            let remaining = ceil_days(grace_period_end - now);
            details.grace_days_remaining = Some(remaining);
            debug!(%expires_at, remaining, "license in grace period");
            return ValidationResult::usable(LicenseStatus::GracePeriod, details).with_warning(
                WarningLevel::Critical,
                format!(
                    "License expired on {}. {} remaining in the grace period before the application is locked. Renew now.",
                    expiry_date,
                    plural_days(remaining)
                ),
            );
        }

        let result = ValidationResult::usable(LicenseStatus::Active, details);
        let days = days_until_expiry;

        if days <= config.critical_days {
            let message = match days {
                d if d <= 0 => {
                    "Your license expires TODAY. Renew now to avoid interruption.".to_string()
                }
                1 => "Your license expires TOMORROW. Renew now to avoid interruption.".to_string(),
                d => format!(
                    "Your license expires in {}. Renew now to avoid interruption.",
                    plural_days(d)
                ),
            };
            result.with_warning(WarningLevel::Critical, message)
        } else if days <= config.urgent_days {
            result.with_warning(
                WarningLevel::Warning,
                format!("Your license expires in {}. Please renew soon.", plural_days(days)),
            )
        } else if days <= config.notice_days {
            result.with_warning(
                WarningLevel::Info,
                format!("Your license expires in {}.", plural_days(days)),
            )
        } else {
            result
        }
    }
}
