//! Local filesystem storage implementation.
//!
//! Every file is written to a sibling `.tmp` file, flushed and synced, then
//! renamed over the target, so an interrupted write leaves the previous
//! version intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{DecisionBook, FetchLog, SeenCache};
use crate::storage::StateStore;

pub const CONFIG_FILE: &str = "config.toml";
pub const CACHE_FILE: &str = "cache.json";
pub const DECISIONS_FILE: &str = "decisions.json";
pub const FETCHES_FILE: &str = "fetches.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(parent, e))?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        if let Err(e) = Self::write_tmp(&tmp, bytes).await {
            // Best effort: the target is untouched either way.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::storage(&tmp, e));
        }

        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| AppError::storage(&path, e))?;
        Ok(())
    }

    async fn write_tmp(tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(&path, e)),
        }
    }

    /// Read JSON data, returning the default value if the file doesn't exist.
    async fn read_json_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.read_bytes(key).await? {
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| AppError::storage(self.path(key), e))
            }
            None => {
                log::debug!("No {} found, starting empty", key);
                Ok(T::default())
            }
        }
    }
}

#[async_trait]
impl StateStore for LocalStorage {
    async fn load_cache(&self) -> Result<SeenCache> {
        self.read_json_or_default(CACHE_FILE).await
    }

    async fn save_cache(&self, cache: &SeenCache) -> Result<()> {
        self.write_json(CACHE_FILE, cache).await?;
        log::info!("{} saved ({} entries)", self.path(CACHE_FILE).display(), cache.len());
        Ok(())
    }

    async fn load_decisions(&self) -> Result<DecisionBook> {
        self.read_json_or_default(DECISIONS_FILE).await
    }

    async fn save_decisions(&self, decisions: &DecisionBook) -> Result<()> {
        self.write_json(DECISIONS_FILE, decisions).await?;
        log::info!(
            "{} saved ({} entries)",
            self.path(DECISIONS_FILE).display(),
            decisions.len()
        );
        Ok(())
    }

    async fn load_fetch_log(&self) -> Result<FetchLog> {
        self.read_json_or_default(FETCHES_FILE).await
    }

    async fn save_fetch_log(&self, log: &FetchLog) -> Result<()> {
        self.write_json(FETCHES_FILE, log).await
    }
}
