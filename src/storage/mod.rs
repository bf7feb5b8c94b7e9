//! Storage abstractions for watch state persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml       # Fetch, filter and HTTP settings
//! ├── cache.json        # Seen repositories: id -> first-seen time
//! ├── decisions.json    # User decisions: id -> "skipped" | "zapped"
//! └── fetches.json      # Last successful fetch per fetch key
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DecisionBook, FetchLog, SeenCache};

// Re-export for convenience
pub use local::LocalStorage;

/// Everything a run needs from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchState {
    pub cache: SeenCache,
    pub decisions: DecisionBook,
    pub fetch_log: FetchLog,
}

/// Trait for watch state backends.
///
/// Loads tolerate missing files (first run) and fail with a storage error on
/// malformed ones. Saves replace the whole file atomically.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load_cache(&self) -> Result<SeenCache>;

    async fn save_cache(&self, cache: &SeenCache) -> Result<()>;

    async fn load_decisions(&self) -> Result<DecisionBook>;

    async fn save_decisions(&self, decisions: &DecisionBook) -> Result<()>;

    async fn load_fetch_log(&self) -> Result<FetchLog>;

    async fn save_fetch_log(&self, log: &FetchLog) -> Result<()>;

    /// Load all state files.
    async fn load(&self) -> Result<WatchState> {
        Ok(WatchState {
            cache: self.load_cache().await?,
            decisions: self.load_decisions().await?,
            fetch_log: self.load_fetch_log().await?,
        })
    }
}
