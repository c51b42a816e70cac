//! Store trait definitions

use async_trait::async_trait;
use uuid::Uuid;

use crate::credential::{Credential, CredentialUpdate, Permissions};
use crate::error::Result;

/// Filter criteria for credential listings
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Restrict to a single owner
    pub owner_id: Option<Uuid>,
    /// Restrict to a single access scope
    pub permissions: Option<Permissions>,
}

impl ListFilter {
    /// Whether a credential matches this filter
    pub fn matches(&self, credential: &Credential) -> bool {
        if let Some(owner) = self.owner_id {
            if credential.owner_id != owner {
                return false;
            }
        }
        if let Some(permissions) = self.permissions {
            if credential.permissions != permissions {
                return false;
            }
        }
        true
    }
}

/// Trait for credential persistence backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load a fully hydrated credential by id
    ///
    /// Fails with NotFound if no row exists.
    async fn load(&self, id: Uuid) -> Result<Credential>;

    /// Insert a new row or update an existing one
    ///
    /// Fails with Conflict if the consumer key already belongs to a
    /// different credential.
    async fn save(&self, credential: &Credential) -> Result<()>;

    /// Apply a partial update and return the updated row
    async fn update(&self, id: Uuid, update: &CredentialUpdate) -> Result<Credential>;

    /// Record a successful use of the credential
    async fn touch_last_access(&self, id: Uuid) -> Result<()>;

    /// Remove a row; deleting an absent id is not an error
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// List credentials matching the filter
    ///
    /// Ordering is stable: created_at ascending, id as tie-breaker, so
    /// re-querying with the same filter reproduces the same sequence.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Credential>>;

    /// Look up a credential by its public key part (for the auth path)
    async fn find_by_consumer_key(&self, consumer_key: &str) -> Result<Option<Credential>>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
