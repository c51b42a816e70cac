//! Credential issuance
//!
//! Mints consumer key/secret pairs, persists only the Argon2id hash of
//! the secret, and hands the raw secret back to the caller exactly once.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::types::{Credential, IssuedCredential, Permissions};
use crate::crypto::{hash_secret, random_hex, verify_secret, RawSecret};
use crate::error::{CredentialError, Result};
use crate::store::CredentialStore;

/// Parameters for key and secret generation
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Prefix for consumer keys (default: "ck_")
    pub key_prefix: String,
    /// Random bytes in a consumer key (default: 32 = 256 bits)
    pub key_bytes: usize,
    /// Prefix for consumer secrets (default: "cs_")
    pub secret_prefix: String,
    /// Random bytes in a consumer secret (default: 32 = 256 bits)
    pub secret_bytes: usize,
    /// Characters of the key kept for display (default: 7)
    pub truncation_len: usize,
    /// Key regeneration attempts on consumer-key collision (default: 3)
    pub max_retries: u32,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            key_prefix: "ck_".to_string(),
            key_bytes: 32,
            secret_prefix: "cs_".to_string(),
            secret_bytes: 32,
            truncation_len: 7,
            max_retries: 3,
        }
    }
}

/// Compute the display-safe suffix of a consumer key
pub fn truncate_key(consumer_key: &str, len: usize) -> String {
    if consumer_key.len() <= len {
        consumer_key.to_string()
    } else {
        consumer_key[consumer_key.len() - len..].to_string()
    }
}

/// Credential issuer
pub struct Issuer {
    /// Storage backend
    store: Arc<dyn CredentialStore>,
    /// Generation parameters
    config: IssuerConfig,
}

impl Issuer {
    /// Create an issuer with default generation parameters
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_config(store, IssuerConfig::default())
    }

    /// Create an issuer with custom generation parameters
    pub fn with_config(store: Arc<dyn CredentialStore>, config: IssuerConfig) -> Self {
        Self { store, config }
    }

    /// Issue a new credential for the given owner
    ///
    /// Returns the persisted record together with the raw consumer
    /// secret. The secret is not recoverable afterwards; only its
    /// Argon2id hash is stored.
    pub async fn issue(
        &self,
        owner_id: Uuid,
        description: &str,
        permissions: Permissions,
    ) -> Result<IssuedCredential> {
        if description.trim().is_empty() {
            return Err(CredentialError::Validation(
                "description must not be empty".to_string(),
            ));
        }

        let secret = format!(
            "{}{}",
            self.config.secret_prefix,
            random_hex(self.config.secret_bytes)
        );
        let secret_hash = hash_secret(&secret)?;

        let mut last_err = None;
        for attempt in 0..=self.config.max_retries {
            let consumer_key = format!(
                "{}{}",
                self.config.key_prefix,
                random_hex(self.config.key_bytes)
            );
            let truncated_key = truncate_key(&consumer_key, self.config.truncation_len);

            let credential = Credential {
                id: Uuid::new_v4(),
                owner_id,
                description: description.to_string(),
                consumer_key,
                secret_hash: secret_hash.clone(),
                truncated_key,
                last_access: None,
                permissions,
                created_at: Utc::now(),
            };

            match self.store.save(&credential).await {
                Ok(()) => {
                    info!(
                        "Issued credential {} (...{}) for owner {}",
                        credential.id, credential.truncated_key, owner_id
                    );
                    return Ok(IssuedCredential {
                        credential,
                        consumer_secret: RawSecret::new(secret),
                    });
                }
                Err(CredentialError::Conflict(msg)) => {
                    warn!(
                        "Consumer key collision on attempt {}, regenerating",
                        attempt + 1
                    );
                    last_err = Some(CredentialError::Conflict(msg));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            CredentialError::Conflict("key generation retries exhausted".to_string())
        }))
    }

    /// Verify a presented secret against a stored credential
    ///
    /// Used by the external authentication path; this crate never caches
    /// the outcome or the presented secret.
    pub fn verify_secret(&self, presented: &str, credential: &Credential) -> Result<bool> {
        verify_secret(presented, &credential.secret_hash)
    }
}
