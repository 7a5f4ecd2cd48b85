//! Machine fingerprint derivation.
//!
//! The fingerprint binds a license to one computer. It is a pure function
//! of four local attributes plus the shared salt, and is recomputed on
//! every call rather than persisted.

use crate::crypto::digest::{group_by_four, sha256_hex_prefix};
use crate::errors::LicenseError;
use tracing::warn;

/// Fingerprint returned when local attributes cannot be read.
pub const ERROR_FINGERPRINT: &str = "ERROR-0000-0000-0000";

/// Fallback when no CPU model is reported.
pub const UNKNOWN_CPU: &str = "unknown-cpu";

/// Fallback when no user name is available.
pub const UNKNOWN_USER: &str = "unknown-user";

/// Fallback when no usable network interface exists.
pub const UNKNOWN_MAC: &str = "unknown-mac";

/// The local attributes a fingerprint is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineAttributes {
    /// Primary CPU model name.
    pub cpu_model: String,
    /// Machine hostname.
    pub hostname: String,
    /// OS user name.
    pub user_name: String,
    /// First usable MAC address, lowercase and colon-separated.
    pub mac_address: String,
}

/// Source of machine attributes.
pub trait AttributeSource: Send + Sync {
    /// Read the current attributes.
    fn collect(&self) -> Result<MachineAttributes, LicenseError>;
}

/// Provider of the current machine's fingerprint.
pub trait MachineIdProvider: Send + Sync {
    /// Current fingerprint. Never fails; see [`ERROR_FINGERPRINT`].
    fn machine_id(&self) -> String;
}

/// Derive the fingerprint for a set of attributes.
///
/// `SHA-256("cpu|host|user|mac" + salt)`, first 16 hex characters
/// uppercased, grouped as `XXXX-XXXX-XXXX-XXXX`.
pub fn fingerprint(attrs: &MachineAttributes, salt: &str) -> String {
    let material = format!(
        "{}|{}|{}|{}{}",
        attrs.cpu_model, attrs.hostname, attrs.user_name, attrs.mac_address, salt
    );
    group_by_four(&sha256_hex_prefix(&material))
}

/// Pick the MAC address used for binding.
///
/// Interfaces are ordered by adapter name so that enumeration order
/// changes (VPNs, adapters toggled) do not move the binding. Loopback
/// adapters and all-zero addresses are skipped.
pub fn select_mac_address<I>(interfaces: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut candidates: Vec<(String, String)> = interfaces
        .into_iter()
        .filter(|(name, mac)| !is_loopback_name(name) && !is_zero_mac(mac))
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    candidates
        .into_iter()
        .next()
        .map(|(_, mac)| mac.to_ascii_lowercase())
        .unwrap_or_else(|| UNKNOWN_MAC.to_string())
}

fn is_loopback_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "lo" || lower.starts_with("lo0") || lower.starts_with("loopback")
}

fn is_zero_mac(mac: &str) -> bool {
    mac.chars().all(|c| c == '0' || c == ':' || c == '-')
}

/// Fingerprint of the host, computed from an [`AttributeSource`].
#[derive(Debug, Clone)]
pub struct HostMachineId<S> {
    source: S,
    salt: &'static str,
}

impl<S: AttributeSource> HostMachineId<S> {
    /// Create a provider reading attributes from `source`.
    pub fn new(source: S, salt: &'static str) -> Self {
        Self { source, salt }
    }
}

impl<S: AttributeSource> MachineIdProvider for HostMachineId<S> {
    fn machine_id(&self) -> String {
        match self.source.collect() {
            Ok(attrs) => fingerprint(&attrs, self.salt),
            Err(e) => {
                warn!(error = %e, "machine attributes unavailable, using error fingerprint");
                ERROR_FINGERPRINT.to_string()
            }
        }
    }
}

/// Provider returning a fixed fingerprint, for deterministic tests.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct FixedMachineId(String);

#[cfg(any(test, feature = "test-seams"))]
impl FixedMachineId {
    /// Create a provider that always reports `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl MachineIdProvider for FixedMachineId {
    fn machine_id(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(MachineAttributes);

    impl AttributeSource for StaticSource {
        fn collect(&self) -> Result<MachineAttributes, LicenseError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl AttributeSource for FailingSource {
        fn collect(&self) -> Result<MachineAttributes, LicenseError> {
            Err(LicenseError::MachineIdentity("hostname unavailable".to_string()))
        }
    }

    fn attrs() -> MachineAttributes {
        MachineAttributes {
            cpu_model: "Intel(R) Core(TM) i7-10700 CPU @ 2.90GHz".to_string(),
            hostname: "office-pc".to_string(),
            user_name: "layla".to_string(),
            mac_address: "3c:52:82:1a:2b:3c".to_string(),
        }
    }

    fn is_fingerprint_shape(fp: &str) -> bool {
        let groups: Vec<&str> = fp.split('-').collect();
        groups.len() == 4
            && groups.iter().all(|g| {
                g.len() == 4 && g.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            })
    }

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint(&attrs(), "salt");
        assert_eq!(fp.len(), 19);
        assert!(is_fingerprint_shape(&fp), "unexpected shape: {}", fp);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint(&attrs(), "salt"), fingerprint(&attrs(), "salt"));
    }

    #[test]
    fn test_fingerprint_matches_digest_of_joined_fields() {
        let material = "Intel(R) Core(TM) i7-10700 CPU @ 2.90GHz|office-pc|layla|3c:52:82:1a:2b:3csalt";
        let expected = group_by_four(&sha256_hex_prefix(material));
        assert_eq!(fingerprint(&attrs(), "salt"), expected);
    }

    #[test]
    fn test_fingerprint_changes_with_any_attribute() {
        let base = fingerprint(&attrs(), "salt");

        let mut other = attrs();
        other.hostname = "home-pc".to_string();
        assert_ne!(fingerprint(&other, "salt"), base);

        let mut other = attrs();
        other.mac_address = "3c:52:82:1a:2b:3d".to_string();
        assert_ne!(fingerprint(&other, "salt"), base);

        assert_ne!(fingerprint(&attrs(), "pepper"), base);
    }

    #[test]
    fn test_select_mac_sorted_by_name() {
        let interfaces = vec![
            ("wlan0".to_string(), "aa:aa:aa:aa:aa:aa".to_string()),
            ("eth0".to_string(), "BB:BB:BB:BB:BB:BB".to_string()),
        ];
        assert_eq!(select_mac_address(interfaces), "bb:bb:bb:bb:bb:bb");
    }

    #[test]
    fn test_select_mac_order_independent() {
        let a = vec![
            ("eth0".to_string(), "11:22:33:44:55:66".to_string()),
            ("tun0".to_string(), "66:55:44:33:22:11".to_string()),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(select_mac_address(a), select_mac_address(b));
    }

    #[test]
    fn test_select_mac_skips_loopback_and_zero() {
        let interfaces = vec![
            ("lo".to_string(), "00:00:00:00:00:00".to_string()),
            ("docker0".to_string(), "00:00:00:00:00:00".to_string()),
            ("Loopback Pseudo-Interface 1".to_string(), "12:34:56:78:9a:bc".to_string()),
            ("wlan0".to_string(), "de:ad:be:ef:00:01".to_string()),
        ];
        assert_eq!(select_mac_address(interfaces), "de:ad:be:ef:00:01");
    }

    #[test]
    fn test_select_mac_fallback() {
        assert_eq!(select_mac_address(Vec::new()), UNKNOWN_MAC);
        let only_loopback = vec![("lo".to_string(), "00:00:00:00:00:00".to_string())];
        assert_eq!(select_mac_address(only_loopback), UNKNOWN_MAC);
    }

    #[test]
    fn test_host_machine_id_uses_source() {
        let provider = HostMachineId::new(StaticSource(attrs()), "salt");
        assert_eq!(provider.machine_id(), fingerprint(&attrs(), "salt"));
        assert_eq!(provider.machine_id(), provider.machine_id());
    }

    #[test]
    fn test_host_machine_id_failure_returns_sentinel() {
        let provider = HostMachineId::new(FailingSource, "salt");
        assert_eq!(provider.machine_id(), ERROR_FINGERPRINT);
    }

    #[test]
    fn test_fixed_machine_id() {
        let provider = FixedMachineId::new("AAAA-AAAA-AAAA-AAAA");
        assert_eq!(provider.machine_id(), "AAAA-AAAA-AAAA-AAAA");
    }
}
