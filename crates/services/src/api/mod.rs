//! Backend collaborator for assessments.

mod dto;
mod http;

use async_trait::async_trait;
use serde::Serialize;

use assess_core::model::{
    Assessment, AssessmentId, AttemptResult, AttemptSubmission, BadgeId, QuestionDraft, QuestionId,
};

use crate::error::ApiError;

pub use http::{ApiConfig, HttpAssessmentApi};

/// Body used to create a new assessment from a draft header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssessment {
    pub title: String,
    pub description: Option<String>,
    pub badge_id: Option<BadgeId>,
}

/// Question body for authoring calls. Unlike the taker view, it carries the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl From<&QuestionDraft> for QuestionInput {
    fn from(draft: &QuestionDraft) -> Self {
        Self {
            question: draft.text.trim().to_owned(),
            options: draft.options.iter().map(|o| o.trim().to_owned()).collect(),
            correct_answer: draft.correct_answer.trim().to_owned(),
        }
    }
}

/// Logical operations consumed from the REST backend.
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    /// Fetch an assessment without correct-answer data.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the id is invalid or not available to the user.
    async fn fetch_assessment_for_taker(&self, id: AssessmentId) -> Result<Assessment, ApiError>;

    /// Submit a finished attempt for grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a malformed payload and
    /// `ApiError::Unauthorized` when the session token is missing or expired.
    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<AttemptResult, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the request.
    async fn create_assessment(&self, input: &NewAssessment) -> Result<AssessmentId, ApiError>;

    /// Replace the header of an existing assessment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the request.
    async fn update_assessment(
        &self,
        assessment_id: AssessmentId,
        input: &NewAssessment,
    ) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the request.
    async fn create_question(
        &self,
        assessment_id: AssessmentId,
        input: &QuestionInput,
    ) -> Result<QuestionId, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the request.
    async fn update_question(
        &self,
        assessment_id: AssessmentId,
        question_id: QuestionId,
        input: &QuestionInput,
    ) -> Result<(), ApiError>;
}
