//! Attribute source backed by the running OS.

use crate::errors::LicenseError;
use crate::machine::fingerprint::{
    select_mac_address, AttributeSource, MachineAttributes, UNKNOWN_CPU, UNKNOWN_USER,
};
use std::env;
use sysinfo::{CpuRefreshKind, Networks, RefreshKind, System};
use tracing::debug;

/// Reads CPU, hostname, user and network attributes from the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAttributes;

impl AttributeSource for SystemAttributes {
    fn collect(&self) -> Result<MachineAttributes, LicenseError> {
        Ok(MachineAttributes {
            cpu_model: cpu_model(),
            hostname: host_name()?,
            user_name: user_name(),
            mac_address: mac_address(),
        })
    }
}

fn cpu_model() -> String {
    let system =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
    system
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| {
            debug!("no CPU brand reported");
            UNKNOWN_CPU.to_string()
        })
}

fn host_name() -> Result<String, LicenseError> {
    hostname::get()
        .map_err(|e| LicenseError::MachineIdentity(format!("Failed to read hostname: {}", e)))?
        .into_string()
        .map_err(|_| LicenseError::MachineIdentity("Hostname is not valid UTF-8".to_string()))
}

fn user_name() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .or_else(|_| env::var("LOGNAME"))
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

fn mac_address() -> String {
    let networks = Networks::new_with_refreshed_list();
    select_mac_address(
        networks
            .list()
            .iter()
            .map(|(name, data)| (name.clone(), data.mac_address().to_string())),
    )
}
