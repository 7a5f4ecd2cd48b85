//! Machine identity: the fingerprint a license is bound to.

pub mod fingerprint;
pub mod system;

pub use fingerprint::{
    fingerprint, AttributeSource, HostMachineId, MachineAttributes, MachineIdProvider,
    ERROR_FINGERPRINT,
};
pub use system::SystemAttributes;

#[cfg(any(test, feature = "test-seams"))]
pub use fingerprint::FixedMachineId;
