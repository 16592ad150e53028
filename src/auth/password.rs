//! Password hashing with argon2 (default parameters, random salt).

use crate::errors::{Error, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Well-formed hash with the default cost parameters that matches no password.
///
/// Login verifies against it when the email is unknown, so both failure paths
/// spend the same argon2 work.
pub const PLACEHOLDER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$b3JkZXItZGVzay1zYWx0IQ$iDcKTs2RZnkCYvDucx/lmWOSGH59wpJTEscAfb7V/sQ";

/// Hashes `password` into a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Checks `password` against a stored PHC hash.
///
/// A stored hash that cannot be parsed is an internal error, not a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| Error::PasswordHash {
        message: e.to_string(),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs a full verification against [`PLACEHOLDER_HASH`] and discards the result.
pub fn verify_placeholder(password: &str) {
    let _ = verify_password(password, PLACEHOLDER_HASH);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn test_placeholder_hash_costs_the_same_and_matches_nothing() {
        let real = hash_password("secret123").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        let placeholder = PasswordHash::new(PLACEHOLDER_HASH).unwrap();

        assert_eq!(placeholder.algorithm, real.algorithm);
        assert_eq!(placeholder.version, real.version);
        assert_eq!(placeholder.params.to_string(), real.params.to_string());

        assert!(!verify_password("secret123", PLACEHOLDER_HASH).unwrap());
        assert!(!verify_password("", PLACEHOLDER_HASH).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_internal() {
        let result = verify_password("secret123", "not-a-phc-string");
        assert!(matches!(result, Err(Error::PasswordHash { .. })));
    }
}
