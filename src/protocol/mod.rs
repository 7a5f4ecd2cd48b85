//! Token wire format: payload model and codec.

pub mod codec;
pub mod models;

pub use codec::{clean_token, decode, DecodedToken, TOKEN_PREFIX};
pub use models::LicensePayload;

#[cfg(any(test, feature = "test-seams"))]
pub use codec::{encode, encode_raw};
