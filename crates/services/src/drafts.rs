//! Authoring drafts: a locally persisted assessment that is reconciled with
//! the backend one question at a time.

use std::sync::Arc;

use assess_core::model::{
    AssessmentDraft, AssessmentId, BadgeId, DraftError, QuestionDraft, QuestionId,
};
use storage::repository::{DraftKey, DraftRepository};

use crate::api::{AssessmentApi, NewAssessment, QuestionInput};
use crate::error::DraftServiceError;
use crate::notify::{Notice, Notifier};

/// Opens draft sessions against a draft store and the backend.
#[derive(Clone)]
pub struct DraftAuthoringService {
    api: Arc<dyn AssessmentApi>,
    drafts: Arc<dyn DraftRepository>,
    notifier: Arc<dyn Notifier>,
}

impl DraftAuthoringService {
    #[must_use]
    pub fn new(
        api: Arc<dyn AssessmentApi>,
        drafts: Arc<dyn DraftRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            drafts,
            notifier,
        }
    }

    /// Load the draft stored under `key` once, or start an empty one.
    ///
    /// # Errors
    ///
    /// Returns `DraftServiceError::Storage` if the store cannot be read.
    pub async fn open(&self, key: DraftKey) -> Result<DraftSession, DraftServiceError> {
        let stored = self.drafts.load_draft(&key).await?;
        let resumed = stored.is_some();
        let draft = stored.unwrap_or_default();
        tracing::debug!(%key, resumed, questions = draft.questions.len(), "draft opened");

        Ok(DraftSession {
            key,
            draft,
            api: Arc::clone(&self.api),
            drafts: Arc::clone(&self.drafts),
            notifier: Arc::clone(&self.notifier),
        })
    }
}

/// One authoring form bound to a single draft key.
///
/// Every local edit is written through to the draft store. The stored draft
/// is only removed by a successful `publish` or an explicit `discard`.
pub struct DraftSession {
    key: DraftKey,
    draft: AssessmentDraft,
    api: Arc<dyn AssessmentApi>,
    drafts: Arc<dyn DraftRepository>,
    notifier: Arc<dyn Notifier>,
}

impl DraftSession {
    #[must_use]
    pub fn key(&self) -> &DraftKey {
        &self.key
    }

    #[must_use]
    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    /// Change the header. Once the assessment exists remotely the change is
    /// sent on the next save or publish.
    ///
    /// # Errors
    ///
    /// Returns `DraftServiceError::Storage` if the draft cannot be persisted.
    pub async fn set_header(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        badge_id: Option<BadgeId>,
    ) -> Result<(), DraftServiceError> {
        self.draft.set_header(title, description, badge_id);
        self.persist().await
    }

    /// Append a question locally. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns `DraftServiceError::Storage` if the draft cannot be persisted.
    pub async fn add_question(&mut self, question: QuestionDraft) -> Result<usize, DraftServiceError> {
        let index = self.draft.push_question(question);
        self.persist().await?;
        Ok(index)
    }

    /// # Errors
    ///
    /// Returns `DraftServiceError::Draft` for an unknown index, or `Storage`
    /// if the draft cannot be persisted.
    pub async fn edit_question(
        &mut self,
        index: usize,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<(), DraftServiceError> {
        self.draft.edit_question(index, text, options, correct_answer)?;
        self.persist().await
    }

    /// Reconcile one question with the backend.
    ///
    /// Creates the assessment first if it has no remote id yet (or sends a
    /// pending header change), then creates or updates the question. Clean
    /// questions are not resent.
    ///
    /// # Errors
    ///
    /// Returns `DraftServiceError::Draft` for invalid content, `Api` when the
    /// backend rejects the call, and `Storage` if the result cannot be persisted.
    pub async fn save_question(&mut self, index: usize) -> Result<QuestionId, DraftServiceError> {
        let question = self
            .draft
            .questions
            .get(index)
            .ok_or(DraftError::NoSuchQuestion { index })?;
        question.validate(index)?;

        if let (false, Some(id)) = (question.needs_save(), question.remote_id) {
            return Ok(id);
        }
        let input = QuestionInput::from(question);
        let existing = question.remote_id;

        let assessment_id = self.ensure_assessment().await?;
        let question_id = match existing {
            Some(id) => {
                self.api.update_question(assessment_id, id, &input).await?;
                id
            }
            None => self.api.create_question(assessment_id, &input).await?,
        };

        if let Some(question) = self.draft.questions.get_mut(index) {
            question.remote_id = Some(question_id);
            question.dirty = false;
        }
        self.persist().await?;
        tracing::info!(%assessment_id, %question_id, index, "question saved");
        Ok(question_id)
    }

    /// Save every pending question and clear the stored draft.
    ///
    /// Questions saved before a failure keep their remote ids, so a retry only
    /// sends what is still pending.
    ///
    /// # Errors
    ///
    /// Returns the first validation, backend, or storage failure. The stored
    /// draft is left in place in that case.
    pub async fn publish(&mut self) -> Result<AssessmentId, DraftServiceError> {
        if let Err(err) = self.draft.validate() {
            self.notifier.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }

        let result = self.publish_pending().await;
        match result {
            Ok(assessment_id) => {
                self.drafts.clear_draft(&self.key).await?;
                self.draft = AssessmentDraft::default();
                tracing::info!(%assessment_id, key = %self.key, "draft published");
                self.notifier
                    .notify(Notice::success("Assessment saved successfully."));
                Ok(assessment_id)
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, pending = self.draft.pending_count(), "publish incomplete");
                self.notifier
                    .notify(Notice::error(format!("Failed to save assessment: {err}")));
                Err(err)
            }
        }
    }

    /// Drop local edits and remove the stored draft.
    ///
    /// # Errors
    ///
    /// Returns `DraftServiceError::Storage` if the store cannot be updated.
    pub async fn discard(&mut self) -> Result<(), DraftServiceError> {
        self.drafts.clear_draft(&self.key).await?;
        self.draft = AssessmentDraft::default();
        Ok(())
    }

    async fn publish_pending(&mut self) -> Result<AssessmentId, DraftServiceError> {
        let assessment_id = self.ensure_assessment().await?;
        for index in 0..self.draft.questions.len() {
            if self.draft.questions[index].needs_save() {
                self.save_question(index).await?;
            }
        }
        Ok(assessment_id)
    }

    async fn ensure_assessment(&mut self) -> Result<AssessmentId, DraftServiceError> {
        if let (false, Some(id)) = (self.draft.header_needs_save(), self.draft.remote_id) {
            return Ok(id);
        }
        self.draft.validate_header()?;

        let input = NewAssessment {
            title: self.draft.title.trim().to_owned(),
            description: self.draft.description.clone(),
            badge_id: self.draft.badge_id,
        };
        let id = match self.draft.remote_id {
            Some(id) => {
                self.api.update_assessment(id, &input).await?;
                tracing::info!(assessment_id = %id, "assessment header updated");
                id
            }
            None => {
                let id = self.api.create_assessment(&input).await?;
                tracing::info!(assessment_id = %id, "assessment created from draft");
                id
            }
        };
        self.draft.remote_id = Some(id);
        self.draft.header_dirty = false;
        self.persist().await?;
        Ok(id)
    }

    async fn persist(&self) -> Result<(), DraftServiceError> {
        self.drafts.save_draft(&self.key, &self.draft).await?;
        Ok(())
    }
}
