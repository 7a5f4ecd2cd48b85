//! On-disk persistence of the activated token.

pub mod file;

pub use file::{LicenseStore, LICENSE_FILE_NAME};
