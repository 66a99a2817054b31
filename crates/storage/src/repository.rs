use async_trait::async_trait;
use assess_core::model::AssessmentDraft;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("invalid draft key: {0:?}")]
    InvalidKey(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Name under which a draft is stored, e.g. `assessment-draft` or `assessment-draft:42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftKey(String);

impl DraftKey {
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for an empty or whitespace-only key.
    pub fn new(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(StorageError::InvalidKey(key));
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository contract for locally persisted authoring drafts.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Fetch a draft, or `None` if nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend or decoding failures.
    async fn load_draft(&self, key: &DraftKey) -> Result<Option<AssessmentDraft>, StorageError>;

    /// Insert or replace the draft stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be stored.
    async fn save_draft(&self, key: &DraftKey, draft: &AssessmentDraft) -> Result<(), StorageError>;

    /// Remove the draft under `key`. Returns whether something was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn clear_draft(&self, key: &DraftKey) -> Result<bool, StorageError>;

    /// List stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_draft_keys(&self) -> Result<Vec<DraftKey>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    drafts: Arc<Mutex<BTreeMap<DraftKey, AssessmentDraft>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryRepository {
    async fn load_draft(&self, key: &DraftKey) -> Result<Option<AssessmentDraft>, StorageError> {
        let guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save_draft(&self, key: &DraftKey, draft: &AssessmentDraft) -> Result<(), StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.clone(), draft.clone());
        Ok(())
    }

    async fn clear_draft(&self, key: &DraftKey) -> Result<bool, StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(key).is_some())
    }

    async fn list_draft_keys(&self) -> Result<Vec<DraftKey>, StorageError> {
        let guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }
}

/// Draft repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub drafts: Arc<dyn DraftRepository>,
}
