//! Checksum and fingerprint digests.

use md5::Md5;
use sha2::{Digest, Sha256};

/// Number of hex characters in a token checksum.
pub const CHECKSUM_LEN: usize = 8;

/// Number of hex characters kept from the fingerprint digest.
pub const FINGERPRINT_HEX_LEN: usize = 16;

/// Compute the token checksum for a payload segment.
///
/// First 8 uppercase hex characters of `MD5(payload_segment + salt)`.
/// The issuer computes the same value, so this must stay bit-exact.
pub fn token_checksum(payload_segment: &str, salt: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(payload_segment.as_bytes());
    hasher.update(salt.as_bytes());
    let mut hex = hex::encode_upper(hasher.finalize());
    hex.truncate(CHECKSUM_LEN);
    hex
}

/// Compare a supplied checksum to the one computed for `payload_segment`.
///
/// Comparison is exact: a lowercased or otherwise altered checksum fails.
pub fn verify_checksum(payload_segment: &str, supplied: &str, salt: &str) -> bool {
    token_checksum(payload_segment, salt) == supplied
}

/// SHA-256 of `material`, first 16 hex characters, uppercased.
pub fn sha256_hex_prefix(material: &str) -> String {
    let hash = Sha256::digest(material.as_bytes());
    let mut hex = hex::encode_upper(hash);
    hex.truncate(FINGERPRINT_HEX_LEN);
    hex
}

/// Insert a hyphen after every 4 characters: `ABCD1234EF567890` -> `ABCD-1234-EF56-7890`.
pub fn group_by_four(hex: &str) -> String {
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("-")
}
