//! License policy: status taxonomy and the validator.

pub mod context;
pub mod status;
pub mod validator;

pub use context::LicenseContext;
pub use status::{
    LicenseDetails, LicenseStatus, MachineMismatch, ValidationDetails, ValidationResult,
    WarningLevel,
};
pub use validator::LicenseValidator;
