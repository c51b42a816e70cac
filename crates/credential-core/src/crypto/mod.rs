//! Cryptographic primitives for credential issuance
//!
//! This module provides:
//! - Random key/secret material generation
//! - Argon2id secret hashing and verification
//! - Secure memory handling with zeroize

mod hashing;
mod secret;

pub use hashing::{hash_secret, random_hex, verify_secret};
pub use secret::RawSecret;
