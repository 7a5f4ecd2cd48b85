//! Activation service - the main public API.
//!
//! `ActivationService` ties the validator to the on-disk store:
//! - Startup check of the stored license
//! - Validate-then-persist activation from the activation screen
//! - A display summary for the host UI

use crate::clock::Clock;
use crate::config::LicenseConfig;
use crate::errors::LicenseError;
use crate::machine::MachineIdProvider;
use crate::policy::{
    LicenseContext, LicenseStatus, LicenseValidator, ValidationDetails, ValidationResult,
    WarningLevel,
};
use crate::store::LicenseStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Message shown when a result carries neither an error nor a warning.
pub const DEFAULT_STATUS_MESSAGE: &str = "License is active";

/// Outcome of an activation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResult {
    /// Whether the token validated *and* was persisted.
    pub success: bool,
    /// The validation outcome. Downgraded to `ERROR` if saving failed.
    #[serde(flatten)]
    pub validation: ValidationResult,
}

/// Read-only projection of the stored license for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseStatusSummary {
    /// Whether the application may run.
    pub is_valid: bool,
    /// Outcome category.
    pub status: LicenseStatus,
    /// Error, else warning, else [`DEFAULT_STATUS_MESSAGE`].
    pub message: String,
    /// Severity of the warning, if any.
    pub warning_level: Option<WarningLevel>,
    /// Payload and diagnostics.
    pub details: Option<ValidationDetails>,
    /// This machine's fingerprint.
    pub machine_id: String,
}

/// Entry point for the host application.
///
/// Create one instance at startup; all calls are synchronous.
#[derive(Debug, Clone)]
pub struct ActivationService {
    validator: LicenseValidator,
    store: LicenseStore,
}

impl ActivationService {
    /// Create a service using wall time, host fingerprinting and the
    /// per-user configuration directory.
    ///
    /// # Errors
    /// - `ConfigError` - configuration validation fails
    /// - `ConfigDirUnavailable` - no per-user configuration directory
    pub fn new(config: LicenseConfig) -> Result<Self, LicenseError> {
        config.validate()?;
        let store = LicenseStore::new(config.store_namespace)?;
        Self::with_context(LicenseContext::system(config), store)
    }

    /// Create a service over a prepared context and store.
    ///
    /// # Errors
    /// - `ConfigError` - the context's configuration fails validation
    pub fn with_context(
        context: LicenseContext,
        store: LicenseStore,
    ) -> Result<Self, LicenseError> {
        context.config.validate()?;
        Ok(Self {
            validator: LicenseValidator::new(context),
            store,
        })
    }

    /// Create a service with explicit clock, machine identity and store.
    pub fn with_parts(
        config: LicenseConfig,
        clock: Arc<dyn Clock>,
        machine: Arc<dyn MachineIdProvider>,
        store: LicenseStore,
    ) -> Result<Self, LicenseError> {
        Self::with_context(LicenseContext::new(config, clock, machine), store)
    }

    /// Validate the stored license, for app startup.
    ///
    /// Nothing stored yields `NO_KEY`. A store that exists but cannot be
    /// read yields `ERROR`, so "never activated" and "broken install" are
    /// distinguishable.
    pub fn check_stored_license(&self) -> ValidationResult {
        match self.store.load() {
            Ok(Some(token)) => self.validator.validate(Some(&token), None),
            Ok(None) => self.validator.validate(None, None),
            Err(e) => ValidationResult::internal_error(format!(
                "Stored license could not be read: {}",
                e
            )),
        }
    }

    /// Validate a token and, if valid, persist it.
    ///
    /// If validation passes but saving fails the result is downgraded to
    /// `ERROR`: the key is genuine but activation did not complete.
    pub fn validate_and_activate(&self, token: &str) -> ActivationResult {
        let machine_id = self.validator.current_machine_id();
        let validation = self.validator.validate(Some(token), Some(&machine_id));

        if !validation.valid {
            info!(status = %validation.status, "activation rejected");
            return ActivationResult {
                success: false,
                validation,
            };
        }

        match self.store.save(token) {
            Ok(()) => {
                info!(status = %validation.status, "license activated");
                ActivationResult {
                    success: true,
                    validation,
                }
            }
            Err(e) => {
                warn!(error = %e, "license valid but could not be saved");
                let mut downgraded = ValidationResult::internal_error(format!(
                    "License key is valid but could not be saved: {}",
                    e
                ));
                downgraded.details = validation.details;
                ActivationResult {
                    success: false,
                    validation: downgraded,
                }
            }
        }
    }

    /// Summary of the stored license for display.
    pub fn license_status_summary(&self) -> LicenseStatusSummary {
        let result = self.check_stored_license();
        let message = result
            .error
            .clone()
            .or_else(|| result.warning.clone())
            .unwrap_or_else(|| DEFAULT_STATUS_MESSAGE.to_string());

        LicenseStatusSummary {
            is_valid: result.valid,
            status: result.status,
            message,
            warning_level: result.warning_level,
            details: result.details,
            machine_id: self.machine_id(),
        }
    }

    /// This machine's fingerprint, for the user to send to the issuer.
    pub fn machine_id(&self) -> String {
        self.validator.current_machine_id()
    }

    /// Remove the stored license.
    ///
    /// Returns `true` if a license was removed.
    pub fn deactivate(&self) -> Result<bool, LicenseError> {
        let removed = self.store.clear()?;
        if removed {
            info!("license deactivated");
        }
        Ok(removed)
    }

    /// The underlying validator.
    pub fn validator(&self) -> &LicenseValidator {
        &self.validator
    }

    /// The underlying store.
    pub fn store(&self) -> &LicenseStore {
        &self.store
    }
}
