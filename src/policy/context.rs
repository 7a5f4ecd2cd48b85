//! Injected dependencies for license validation.

use crate::clock::{Clock, SystemClock};
use crate::config::LicenseConfig;
use crate::machine::{HostMachineId, MachineIdProvider, SystemAttributes};
use std::sync::Arc;

/// Everything the validator depends on besides the token.
///
/// Validation is a pure function of token, context and the clock's current
/// time, so tests swap in a `MockClock` and a `FixedMachineId`.
#[derive(Clone)]
pub struct LicenseContext {
    /// Shared constants.
    pub config: LicenseConfig,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Current machine fingerprint source.
    pub machine: Arc<dyn MachineIdProvider>,
}

impl LicenseContext {
    /// Context backed by wall time and the host's hardware attributes.
    pub fn system(config: LicenseConfig) -> Self {
        let machine = HostMachineId::new(SystemAttributes, config.salt);
        Self {
            config,
            clock: Arc::new(SystemClock),
            machine: Arc::new(machine),
        }
    }

    /// Context with explicit clock and machine-id sources.
    pub fn new(
        config: LicenseConfig,
        clock: Arc<dyn Clock>,
        machine: Arc<dyn MachineIdProvider>,
    ) -> Self {
        Self {
            config,
            clock,
            machine,
        }
    }
}

impl std::fmt::Debug for LicenseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseContext")
            .field("store_namespace", &self.config.store_namespace)
            .field("grace_period_days", &self.config.grace_period_days)
            .finish_non_exhaustive()
    }
}
