//! # Qanuni License
//!
//! **Offline license validation and machine binding for the Qanuni desktop app.**
//!
//! A license token is issued out-of-band, pasted into the activation screen,
//! checked, bound to this machine and stored. Every launch re-validates the
//! stored token against the current time; validity is never cached.
//!
//! ## Token lifecycle
//!
//! - **Active**: before `expiresAt`, with `info`/`warning`/`critical`
//!   notices from 30, 7 and 1 days out
//! - **Grace period**: up to 7 days after `expiresAt`; still usable,
//!   always warns at `critical`
//! - **Expired**: after the grace period; hard lockout
//!
//! ## Quickstart
//!
//! ```no_run
//! use qanuni_license::{ActivationService, LicenseConfig};
//!
//! fn main() -> Result<(), qanuni_license::LicenseError> {
//!     let service = ActivationService::new(LicenseConfig::default())?;
//!
//!     let status = service.check_stored_license();
//!     if !status.valid {
//!         println!("Activation required. Machine ID: {}", service.machine_id());
//!         let outcome = service.validate_and_activate("QANUNI-...-0123ABCD");
//!         println!("Activated: {} ({})", outcome.success, outcome.validation.status);
//!     } else if let Some(warning) = status.warning {
//!         println!("{}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Threat Model
//!
//! The checksum is an MD5 over the payload and a salt embedded in the
//! binary. It catches typos and casual tampering. It is **not** a signature:
//! anyone who extracts the salt can mint tokens. Asymmetric signing is the
//! natural successor and is out of scope here.
//!
//! ## Configuration
//!
//! - `salt`: shared with the issuer; changing it invalidates every token
//! - `grace_period_days`: days of use allowed after expiry
//! - `notice_days` / `urgent_days` / `critical_days`: warning thresholds
//! - `store_namespace`: directory under the user config dir for `license.key`
//!
//! See [`LicenseConfig`] for full documentation.

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Crypto layer
pub mod crypto;

// Machine identity
pub mod machine;

// Token codec
pub mod protocol;

// Validation policy
pub mod policy;

// Persistence
pub mod store;

// Activation service (main public API)
pub mod manager;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::LicenseConfig;
pub use errors::{DecodeError, LicenseError};
pub use machine::{HostMachineId, MachineIdProvider, SystemAttributes, ERROR_FINGERPRINT};
pub use manager::{ActivationResult, ActivationService, LicenseStatusSummary};
pub use policy::{
    LicenseContext, LicenseDetails, LicenseStatus, LicenseValidator, ValidationDetails,
    ValidationResult, WarningLevel,
};
pub use protocol::{decode, LicensePayload};
pub use store::LicenseStore;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "test-seams"))]
pub use machine::FixedMachineId;
