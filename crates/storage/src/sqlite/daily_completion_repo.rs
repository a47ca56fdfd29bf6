use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::daily::DailyKey;
use sqlx::Row;

use crate::repository::{DailyCompletionRepository, StorageError};

use super::SqliteRepository;

impl SqliteRepository {
    /// When a day was first marked completed, if it was.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or the timestamp cannot be decoded.
    pub async fn completed_at(&self, key: &DailyKey) -> Result<Option<DateTime<Utc>>, StorageError> {
        let row = sqlx::query("SELECT completed_at FROM daily_completions WHERE day = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.map(|row| {
            row.try_get::<DateTime<Utc>, _>("completed_at")
                .map_err(|err| StorageError::Serialization(err.to_string()))
        })
        .transpose()
    }
}

#[async_trait]
impl DailyCompletionRepository for SqliteRepository {
    async fn is_completed(&self, key: &DailyKey) -> Result<Option<bool>, StorageError> {
        let row = sqlx::query("SELECT completed FROM daily_completions WHERE day = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let completed: i64 = row
            .try_get("completed")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(completed != 0))
    }

    async fn mark_completed(
        &self,
        key: &DailyKey,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO daily_completions (day, completed, completed_at)
            VALUES (?1, 1, ?2)
            ON CONFLICT(day) DO NOTHING
            ",
        )
        .bind(key.as_str())
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
