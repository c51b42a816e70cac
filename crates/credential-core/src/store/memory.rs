//! In-memory store backend
//!
//! Backs tests and embedders that provide their own durability. The
//! consumer-key uniqueness check runs under the write lock, so racing
//! saves of colliding keys see Conflict rather than silently clobbering.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{CredentialStore, ListFilter};
use crate::credential::{Credential, CredentialUpdate};
use crate::error::{CredentialError, Result};

/// In-memory credential store
#[derive(Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<HashMap<Uuid, Credential>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no rows
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn check_key_unique(rows: &HashMap<Uuid, Credential>, credential: &Credential) -> Result<()> {
    for existing in rows.values() {
        if existing.id != credential.id && existing.consumer_key == credential.consumer_key {
            return Err(CredentialError::Conflict(format!(
                "consumer key ...{} already in use",
                credential.truncated_key
            )));
        }
    }
    Ok(())
}

fn sort_stable(rows: &mut [Credential]) {
    rows.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn load(&self, id: Uuid) -> Result<Credential> {
        let rows = self.rows.read().await;
        rows.get(&id)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        let mut rows = self.rows.write().await;
        check_key_unique(&rows, credential)?;
        rows.insert(credential.id, credential.clone());
        debug!("Saved credential: {}", credential.id);
        Ok(())
    }

    async fn update(&self, id: Uuid, update: &CredentialUpdate) -> Result<Credential> {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))?;

        if let Some(description) = &update.description {
            row.description = description.clone();
        }
        if let Some(permissions) = update.permissions {
            row.permissions = permissions;
        }

        Ok(row.clone())
    }

    async fn touch_last_access(&self, id: Uuid) -> Result<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))?;
        row.last_access = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.remove(&id).is_some() {
            debug!("Deleted credential: {}", id);
        }
        Ok(())
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Credential>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<Credential> = rows
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        sort_stable(&mut matched);
        Ok(matched)
    }

    async fn find_by_consumer_key(&self, consumer_key: &str) -> Result<Option<Credential>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|c| c.consumer_key == consumer_key)
            .cloned())
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Store"
    }
}
