use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use assess_core::model::AssessmentDraft;

use crate::repository::{DraftKey, DraftRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl DraftRepository for SqliteRepository {
    async fn load_draft(&self, key: &DraftKey) -> Result<Option<AssessmentDraft>, StorageError> {
        let row = sqlx::query("SELECT body FROM drafts WHERE draft_key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let body: String = row
            .try_get("body")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_draft(&self, key: &DraftKey, draft: &AssessmentDraft) -> Result<(), StorageError> {
        let body = serde_json::to_string(draft)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO drafts (draft_key, body, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(draft_key) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_draft(&self, key: &DraftKey) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM drafts WHERE draft_key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_draft_keys(&self) -> Result<Vec<DraftKey>, StorageError> {
        let rows = sqlx::query("SELECT draft_key FROM drafts ORDER BY draft_key ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        rows.iter()
            .map(|row| {
                let raw: String = row
                    .try_get("draft_key")
                    .map_err(|err| StorageError::Serialization(err.to_string()))?;
                DraftKey::new(raw)
            })
            .collect()
    }
}
