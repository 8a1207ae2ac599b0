//! Argon2id password hashing and verification.
//!
//! Hashes use a random salt from [`OsRng`] and are stored in PHC string
//! format, so the cost parameters travel with each hash and verification
//! never needs the current configuration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Default Argon2 time cost (iterations).
pub const DEFAULT_TIME_COST: u32 = 3;

#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Argon2 iterations. Memory and parallelism stay at the library defaults.
    pub time_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
        }
    }
}

impl PasswordConfig {
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `PASSWORD_HASH_COST` | `3`     |
    ///
    /// # Panics
    ///
    /// Panics if `PASSWORD_HASH_COST` is not a valid `u32` or is `0`.
    pub fn from_env() -> Self {
        let time_cost: u32 = std::env::var("PASSWORD_HASH_COST")
            .unwrap_or_else(|_| DEFAULT_TIME_COST.to_string())
            .parse()
            .expect("PASSWORD_HASH_COST must be a valid u32");
        Self::with_time_cost(time_cost)
    }

    /// # Panics
    ///
    /// Panics if `time_cost` is `0`; Argon2 rejects it on every hash.
    pub fn with_time_cost(time_cost: u32) -> Self {
        assert!(time_cost >= 1, "PASSWORD_HASH_COST must be at least 1");
        Self { time_cost }
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_password(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, argon2::password_hash::Error> {
    let params = Params::new(
        Params::DEFAULT_M_COST,
        config.time_cost,
        Params::DEFAULT_P_COST,
        None,
    )?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
