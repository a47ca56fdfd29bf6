use std::sync::Arc;

use log::warn;
use quiz_core::Clock;
use quiz_core::daily::DailyKey;
use storage::repository::{DailyCompletionRepository, StorageError};

/// Guards the once-per-day daily challenge.
///
/// Reads fail open: if the store cannot be read the day counts as not
/// completed, so a broken store never locks the player out.
#[derive(Clone)]
pub struct DailyCompletionGate {
    clock: Clock,
    repo: Arc<dyn DailyCompletionRepository>,
}

impl DailyCompletionGate {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn DailyCompletionRepository>) -> Self {
        Self { clock, repo }
    }

    /// Key for the clock's current UTC date.
    #[must_use]
    pub fn today_key(&self) -> DailyKey {
        DailyKey::for_date(self.clock.today())
    }

    pub async fn has_completed(&self, key: &DailyKey) -> bool {
        match self.repo.is_completed(key).await {
            Ok(flag) => flag.unwrap_or(false),
            Err(err) => {
                warn!("daily completion read failed for {key}, treating as not completed: {err}");
                false
            }
        }
    }

    pub async fn has_completed_today(&self) -> bool {
        self.has_completed(&self.today_key()).await
    }

    /// Record that the daily challenge for `key` was attempted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be written.
    pub async fn mark_completed(&self, key: &DailyKey) -> Result<(), StorageError> {
        self.repo.mark_completed(key, self.clock.now()).await
    }
}
