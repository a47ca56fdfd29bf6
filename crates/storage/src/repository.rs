use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::daily::DailyKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable per-day completion flags for the daily challenge.
///
/// Keys are calendar dates (`YYYY-MM-DD`). A day is either absent or marked
/// completed; there is no way to un-complete a day.
#[async_trait]
pub trait DailyCompletionRepository: Send + Sync {
    /// Read the flag for a day.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn is_completed(&self, key: &DailyKey) -> Result<Option<bool>, StorageError>;

    /// Mark a day completed. Marking an already completed day is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be stored.
    async fn mark_completed(
        &self,
        key: &DailyKey,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    daily: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            daily: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// When a day was first marked completed, if it was.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn completed_at(&self, key: &DailyKey) -> Result<Option<DateTime<Utc>>, StorageError> {
        let guard = self
            .daily
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key.as_str()).copied())
    }
}

#[async_trait]
impl DailyCompletionRepository for InMemoryRepository {
    async fn is_completed(&self, key: &DailyKey) -> Result<Option<bool>, StorageError> {
        let guard = self
            .daily
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key.as_str()).map(|_| true))
    }

    async fn mark_completed(
        &self,
        key: &DailyKey,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .daily
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.entry(key.as_str().to_owned()).or_insert(completed_at);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub daily_completions: Arc<dyn DailyCompletionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let daily_completions: Arc<dyn DailyCompletionRepository> =
            Arc::new(InMemoryRepository::new());
        Self { daily_completions }
    }
}
