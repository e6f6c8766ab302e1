use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AnalysisHistory, Watchlist};

/// Errors surfaced by watchlist and history backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be reached.
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    /// A stored payload could not be encoded or decoded.
    #[error("store payload invalid: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence backend for the user's watchlist.
///
/// The calling session picks one backend up front (remote when signed in,
/// in-memory otherwise) and keeps using it; implementations do not fall back
/// to each other mid-session.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    async fn load(&self) -> Result<Watchlist, StoreError>;
    async fn save(&self, watchlist: &Watchlist) -> Result<(), StoreError>;
}

/// Persistence backend for per-symbol analysis history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> Result<AnalysisHistory, StoreError>;
    async fn save(&self, history: &AnalysisHistory) -> Result<(), StoreError>;
}

/// In-memory backend used for signed-out sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    watchlist: RwLock<Watchlist>,
    history: RwLock<AnalysisHistory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[async_trait]
impl WatchlistStore for MemoryStore {
    async fn load(&self) -> Result<Watchlist, StoreError> {
        Ok(self.watchlist.read().unwrap().clone())
    }

    async fn save(&self, watchlist: &Watchlist) -> Result<(), StoreError> {
        *self.watchlist.write().unwrap() = watchlist.clone();
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn load(&self) -> Result<AnalysisHistory, StoreError> {
        Ok(self.history.read().unwrap().clone())
    }

    async fn save(&self, history: &AnalysisHistory) -> Result<(), StoreError> {
        *self.history.write().unwrap() = history.clone();
        Ok(())
    }
}
