//! JSON file store backend
//!
//! Persists credential rows in a single JSON file in the user's data
//! directory. Rows never contain raw secret material - the secret field
//! is an Argon2id hash computed at issuance - so the file itself needs
//! no at-rest encryption.
//!
//! Constructors read any existing store file, so uniqueness checks and
//! reads always run against previously persisted rows. Mutations write
//! through to disk before returning; a failed write rolls the cache
//! back so the instance never serves rows the file does not hold.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{CredentialStore, ListFilter};
use crate::credential::{Credential, CredentialUpdate};
use crate::error::{CredentialError, Result};

/// Store file name inside the storage directory
const STORE_FILE: &str = "credentials.json";

/// File-backed credential store
pub struct FileStore {
    /// Directory for the store file
    storage_dir: PathBuf,
    /// In-memory cache of the store
    cache: Arc<RwLock<StoreCache>>,
}

/// In-memory representation of stored rows
#[derive(Debug, Default)]
struct StoreCache {
    rows: HashMap<Uuid, Credential>,
    /// Whether the cache has been modified since last save
    dirty: bool,
}

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    credentials: Vec<Credential>,
}

impl FileStore {
    /// Create a store in the default data directory
    pub fn new() -> Result<Self> {
        let storage_dir = Self::default_storage_dir()?;
        Self::with_dir(storage_dir)
    }

    /// Create with a custom storage directory (for testing)
    ///
    /// Reads an existing store file if one is present.
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        let rows = Self::read_rows(&storage_dir.join(STORE_FILE))?;

        debug!(
            "File store initialized at {:?} with {} credentials",
            storage_dir,
            rows.len()
        );

        Ok(Self {
            storage_dir,
            cache: Arc::new(RwLock::new(StoreCache { rows, dirty: false })),
        })
    }

    /// Get the default storage directory
    fn default_storage_dir() -> Result<PathBuf> {
        ProjectDirs::from("dev", "credential-core", "credential-core")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CredentialError::Storage("Could not determine data directory".to_string())
            })
    }

    /// Path to the store file
    fn store_file_path(&self) -> PathBuf {
        self.storage_dir.join(STORE_FILE)
    }

    /// Parse the store file into a row map; absent file means no rows
    fn read_rows(path: &PathBuf) -> Result<HashMap<Uuid, Credential>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&contents)?;
        Ok(file.credentials.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Re-read rows from disk, discarding cached state
    ///
    /// Only needed when another process may have rewritten the file;
    /// constructors already pick up existing rows.
    pub async fn load_from_disk(&self) -> Result<()> {
        let rows = Self::read_rows(&self.store_file_path())?;

        let mut cache = self.cache.write().await;
        cache.rows = rows;
        cache.dirty = false;

        debug!("Loaded {} credentials from store", cache.rows.len());
        Ok(())
    }

    /// Write the cache to disk if modified; caller holds the write lock
    async fn persist(&self, cache: &mut StoreCache) -> Result<()> {
        if !cache.dirty {
            return Ok(());
        }

        let mut credentials: Vec<Credential> = cache.rows.values().cloned().collect();
        credentials.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let file = StoreFile {
            version: 1,
            credentials,
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.store_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        cache.dirty = false;
        debug!("Saved {} credentials to store", cache.rows.len());
        Ok(())
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
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

#[async_trait]
impl CredentialStore for FileStore {
    async fn load(&self, id: Uuid) -> Result<Credential> {
        let cache = self.cache.read().await;
        cache
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        let mut cache = self.cache.write().await;
        check_key_unique(&cache.rows, credential)?;

        let was_dirty = cache.dirty;
        let previous = cache.rows.insert(credential.id, credential.clone());
        cache.dirty = true;

        if let Err(e) = self.persist(&mut cache).await {
            match previous {
                Some(prev) => cache.rows.insert(credential.id, prev),
                None => cache.rows.remove(&credential.id),
            };
            cache.dirty = was_dirty;
            return Err(e);
        }

        debug!("Saved credential: {}", credential.id);
        Ok(())
    }

    async fn update(&self, id: Uuid, update: &CredentialUpdate) -> Result<Credential> {
        let mut cache = self.cache.write().await;
        let row = cache
            .rows
            .get_mut(&id)
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))?;

        let previous = row.clone();

        if let Some(description) = &update.description {
            row.description = description.clone();
        }
        if let Some(permissions) = update.permissions {
            row.permissions = permissions;
        }

        let updated = row.clone();
        let was_dirty = cache.dirty;
        cache.dirty = true;

        if let Err(e) = self.persist(&mut cache).await {
            cache.rows.insert(id, previous);
            cache.dirty = was_dirty;
            return Err(e);
        }

        Ok(updated)
    }

    async fn touch_last_access(&self, id: Uuid) -> Result<()> {
        let mut cache = self.cache.write().await;
        let row = cache
            .rows
            .get_mut(&id)
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))?;

        let previous = row.clone();
        row.last_access = Some(Utc::now());

        let was_dirty = cache.dirty;
        cache.dirty = true;

        if let Err(e) = self.persist(&mut cache).await {
            cache.rows.insert(id, previous);
            cache.dirty = was_dirty;
            return Err(e);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut cache = self.cache.write().await;

        let removed = match cache.rows.remove(&id) {
            Some(row) => row,
            None => return Ok(()),
        };

        let was_dirty = cache.dirty;
        cache.dirty = true;

        if let Err(e) = self.persist(&mut cache).await {
            cache.rows.insert(id, removed);
            cache.dirty = was_dirty;
            return Err(e);
        }

        debug!("Deleted credential: {}", id);
        Ok(())
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Credential>> {
        let cache = self.cache.read().await;
        let mut matched: Vec<Credential> = cache
            .rows
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn find_by_consumer_key(&self, consumer_key: &str) -> Result<Option<Credential>> {
        let cache = self.cache.read().await;
        Ok(cache
            .rows
            .values()
            .find(|c| c.consumer_key == consumer_key)
            .cloned())
    }

    fn backend_name(&self) -> &'static str {
        "JSON File Store"
    }
}
