//! Public API smoke tests; no test seams required.

use qanuni_license::{
    decode, DecodeError, LicenseConfig, LicenseContext, LicenseStatus, LicenseStore,
    LicenseValidator, MachineIdProvider, SystemClock, ValidationResult,
};
use std::sync::Arc;
use tempfile::TempDir;

struct StaticMachine;

impl MachineIdProvider for StaticMachine {
    fn machine_id(&self) -> String {
        "AAAA-AAAA-AAAA-AAAA".to_string()
    }
}

fn validator() -> LicenseValidator {
    LicenseValidator::new(LicenseContext::new(
        LicenseConfig::default(),
        Arc::new(SystemClock),
        Arc::new(StaticMachine),
    ))
}

fn validate(token: &str) -> ValidationResult {
    validator().validate(Some(token), None)
}

#[test]
fn empty_token_is_no_key() {
    assert_eq!(validate("").status, LicenseStatus::NoKey);
}

#[test]
fn foreign_prefix_is_invalid_format() {
    let result = validate("NOTQANUNI-xxx-yyy");
    assert_eq!(result.status, LicenseStatus::InvalidFormat);
    assert!(!result.valid);
}

#[test]
fn wrong_checksum_is_invalid_checksum() {
    assert_eq!(
        decode("QANUNI-eyJtYWNoaW5lSWQiOiJBQUFBIn0=-00000000", "salt"),
        Err(DecodeError::InvalidChecksum)
    );
}

#[test]
fn host_machine_id_is_stable() {
    let machine_a = qanuni_license::HostMachineId::new(
        qanuni_license::SystemAttributes,
        LicenseConfig::default().salt,
    );
    let machine_b = qanuni_license::HostMachineId::new(
        qanuni_license::SystemAttributes,
        LicenseConfig::default().salt,
    );
    assert_eq!(machine_a.machine_id(), machine_b.machine_id());
}

#[test]
fn store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = LicenseStore::at_dir(temp_dir.path());
    assert_eq!(store.load().unwrap(), None);
    store.save("QANUNI-abc-0123ABCD").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("QANUNI-abc-0123ABCD"));
    assert!(store.clear().unwrap());
}
