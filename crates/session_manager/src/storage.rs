//! Durable key-value persistence for the session record
//!
//! The persisted layout is two independent string entries: the serialized
//! session under [`SESSION_KEY`] and the bare refresh token under
//! [`REFRESH_TOKEN_KEY`]. Both are written together on every successful
//! login/refresh and removed together on logout, so a corrupt or missing
//! entry can be detected independently.

use crate::error::{Result, SessionError};
use async_trait::async_trait;
use auth_core::AuthUser;
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Storage key holding the serialized session record.
pub const SESSION_KEY: &str = "auth_user";

/// Storage key holding the bare refresh token string.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key-value persistence collaborator, the browser-storage equivalent.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage: one file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    base_path: PathBuf,
}

impl FileKeyValueStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl KeyValueStorage for FileKeyValueStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        Ok(Some(contents))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        fs::write(self.entry_path(key), value)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Typed view over the two persisted session entries.
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Restore the stored session. Malformed or unreadable data reads as
    /// absent and never raises.
    pub async fn load_user(&self) -> Option<AuthUser> {
        let raw = match self.storage.get(SESSION_KEY).await {
            Ok(value) => value?,
            Err(error) => {
                warn!("failed to read stored session: {error}");
                return None;
            }
        };
        match serde_json::from_str::<AuthUser>(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                warn!("discarding malformed stored session: {error}");
                None
            }
        }
    }

    /// The stored refresh token, if any. Empty strings count as absent.
    pub async fn refresh_token(&self) -> Option<String> {
        self.storage
            .get(REFRESH_TOKEN_KEY)
            .await
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    /// Persist the session record and its refresh token together.
    pub async fn store_user(&self, user: &AuthUser) -> Result<()> {
        let serialized =
            serde_json::to_string(user).map_err(|e| SessionError::Storage(e.to_string()))?;
        self.storage.set(SESSION_KEY, &serialized).await?;
        self.storage.set(REFRESH_TOKEN_KEY, &user.refresh_token).await
    }

    /// Remove both entries. The first failure is reported after both removes
    /// have been attempted.
    pub async fn clear(&self) -> Result<()> {
        let session = self.storage.remove(SESSION_KEY).await;
        let token = self.storage.remove(REFRESH_TOKEN_KEY).await;
        session.and(token)
    }
}
