//! Startup license check.
//!
//! Prints this machine's fingerprint and the stored license status. With a
//! token argument, attempts activation first.
//!
//! # Running
//!
//! ```bash
//! cargo run --example check_license
//! cargo run --example check_license -- "QANUNI-...-0123ABCD"
//! ```

use qanuni_license::{ActivationService, LicenseConfig};

fn main() {
    let service = match ActivationService::new(LicenseConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Machine ID: {}", service.machine_id());
    println!("License file: {}", service.store().path().display());

    if let Some(token) = std::env::args().nth(1) {
        let outcome = service.validate_and_activate(&token);
        if outcome.success {
            println!("Activated ({})", outcome.validation.status);
        } else {
            let reason = outcome.validation.error.as_deref().unwrap_or("unknown error");
            eprintln!("Activation failed ({}): {}", outcome.validation.status, reason);
        }
    }

    let summary = service.license_status_summary();
    println!("Status: {} - {}", summary.status, summary.message);
    if !summary.is_valid {
        std::process::exit(2);
    }
}
