//! Digest primitives shared by the token codec and machine identity.

pub mod digest;
