//! Secret hashing using Argon2id
//!
//! The raw consumer secret is never persisted; only the PHC-format
//! Argon2id hash produced here is stored, and verification runs the
//! presented secret back through the same parameters.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CredentialError, Result};

/// Generate `len` cryptographically secure random bytes, hex-encoded
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a raw secret into a PHC-format Argon2id string
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| CredentialError::Crypto(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a presented secret against a stored PHC-format hash
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CredentialError::Crypto(e.to_string()))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Crypto(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_hex_length_and_uniqueness() {
        let a = random_hex(32);
        let b = random_hex(32);
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_secret("cs_super_secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_secret("cs_super_secret", &hash).unwrap());
        assert!(!verify_secret("cs_wrong", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_secret("cs_super_secret").unwrap();
        let b = hash_secret("cs_super_secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_secret("cs_x", "not-a-phc-string").is_err());
    }
}
