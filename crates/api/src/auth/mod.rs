//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Session token issuance and validation.

pub mod jwt;
pub mod password;
