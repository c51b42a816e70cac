//! Credential type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::RawSecret;
use crate::error::{CredentialError, Result};
use crate::store::CredentialStore;

/// Access scope granted to a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permissions {
    /// Read-only access
    Read,
    /// Write-only access
    Write,
    /// Full access
    ReadWrite,
}

impl Default for Permissions {
    fn default() -> Self {
        Self::Read
    }
}

impl Permissions {
    /// Human-readable label for operator views
    pub fn label(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::ReadWrite => "Read/Write",
        }
    }
}

impl std::str::FromStr for Permissions {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "read_write" => Ok(Self::ReadWrite),
            other => Err(CredentialError::Validation(format!(
                "unrecognized permission value: {}",
                other
            ))),
        }
    }
}

/// A persisted credential row (safe to display - the secret is stored
/// only as an Argon2id hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Owning principal (external user entity)
    pub owner_id: Uuid,

    /// User-friendly label
    pub description: String,

    /// Public key part (e.g., "ck_4f2a..."), unique across all credentials
    pub consumer_key: String,

    /// PHC-format Argon2id hash of the consumer secret
    pub secret_hash: String,

    /// Last characters of the consumer key, precomputed for display
    pub truncated_key: String,

    /// Last time this credential was successfully used
    pub last_access: Option<DateTime<Utc>>,

    /// Access scope
    pub permissions: Permissions,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Partial field update applied through the store
///
/// Immutable fields (id, consumer_key, secret_hash, truncated_key) are
/// deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialUpdate {
    /// New description, if changing
    pub description: Option<String>,
    /// New access scope, if changing
    pub permissions: Option<Permissions>,
}

/// Result of issuing a credential - the only place the raw secret appears
pub struct IssuedCredential {
    /// The persisted record
    pub credential: Credential,
    /// Raw consumer secret, zeroed on drop; shown to the caller once
    pub consumer_secret: RawSecret,
}

impl std::fmt::Debug for IssuedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedCredential")
            .field("credential", &self.credential)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

/// A credential held either by reference (id only) or fully hydrated
///
/// Collaborators may pass ids around without loading the row; `hydrate`
/// performs the explicit load transition.
#[derive(Debug, Clone)]
pub enum CredentialHandle {
    /// Only the id is known
    Reference(Uuid),
    /// Full record is loaded
    Hydrated(Credential),
}

impl CredentialHandle {
    /// The stable identifier, available in both states
    pub fn id(&self) -> Uuid {
        match self {
            Self::Reference(id) => *id,
            Self::Hydrated(c) => c.id,
        }
    }

    /// Whether the full record is loaded
    pub fn is_hydrated(&self) -> bool {
        matches!(self, Self::Hydrated(_))
    }

    /// Access the full record, failing if only a reference is held
    pub fn record(&self) -> Result<&Credential> {
        match self {
            Self::Hydrated(c) => Ok(c),
            Self::Reference(id) => Err(CredentialError::InvalidState(format!(
                "credential {} is not hydrated",
                id
            ))),
        }
    }

    /// Load the full record from the store, transitioning to Hydrated
    pub async fn hydrate(&mut self, store: &dyn CredentialStore) -> Result<&Credential> {
        if let Self::Reference(id) = self {
            let credential = store.load(*id).await?;
            *self = Self::Hydrated(credential);
        }
        self.record()
    }
}

impl From<Credential> for CredentialHandle {
    fn from(credential: Credential) -> Self {
        Self::Hydrated(credential)
    }
}
