use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AssessmentId, BadgeId, MIN_OPTIONS, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DraftError {
    #[error("assessment title cannot be empty")]
    EmptyTitle,

    #[error("question {index} has no text")]
    EmptyQuestion { index: usize },

    #[error("question {index} needs at least two distinct non-empty options")]
    TooFewOptions { index: usize },

    #[error("question {index}: correct answer is not one of the options")]
    CorrectAnswerNotAnOption { index: usize },

    #[error("no question at index {index}")]
    NoSuchQuestion { index: usize },

    #[error("an assessment needs at least one question")]
    NoQuestions,
}

/// One question being authored, with its backend reconciliation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub remote_id: Option<QuestionId>,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    /// Local edits not yet saved to the backend.
    pub dirty: bool,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(text: impl Into<String>, options: Vec<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            remote_id: None,
            text: text.into(),
            options,
            correct_answer: correct_answer.into(),
            dirty: true,
        }
    }

    /// Checks text, options, and correct answer for the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns the first `DraftError` found.
    pub fn validate(&self, index: usize) -> Result<(), DraftError> {
        if self.text.trim().is_empty() {
            return Err(DraftError::EmptyQuestion { index });
        }

        let mut distinct: Vec<&str> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < MIN_OPTIONS || distinct.len() != self.options.len() {
            return Err(DraftError::TooFewOptions { index });
        }

        if !self.options.iter().any(|o| o == &self.correct_answer) {
            return Err(DraftError::CorrectAnswerNotAnOption { index });
        }
        Ok(())
    }

    #[must_use]
    pub fn needs_save(&self) -> bool {
        self.dirty || self.remote_id.is_none()
    }
}

/// In-progress assessment authored by a developer, persisted between visits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub title: String,
    pub description: Option<String>,
    pub badge_id: Option<BadgeId>,
    pub remote_id: Option<AssessmentId>,
    pub questions: Vec<QuestionDraft>,
    /// Header changed since the backend last saw it.
    #[serde(default)]
    pub header_dirty: bool,
}

impl AssessmentDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Replaces title, description, and badge, and marks the header dirty.
    pub fn set_header(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        badge_id: Option<BadgeId>,
    ) {
        self.title = title.into();
        self.description = description;
        self.badge_id = badge_id;
        self.header_dirty = true;
    }

    #[must_use]
    pub fn header_needs_save(&self) -> bool {
        self.header_dirty || self.remote_id.is_none()
    }

    /// Appends a question and returns its index.
    pub fn push_question(&mut self, question: QuestionDraft) -> usize {
        self.questions.push(question);
        self.questions.len() - 1
    }

    /// Replaces the content of a question and marks it dirty, keeping its remote id.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::NoSuchQuestion` for an out of range index.
    pub fn edit_question(
        &mut self,
        index: usize,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<(), DraftError> {
        let question = self
            .questions
            .get_mut(index)
            .ok_or(DraftError::NoSuchQuestion { index })?;
        question.text = text.into();
        question.options = options;
        question.correct_answer = correct_answer.into();
        question.dirty = true;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DraftError::EmptyTitle` for a blank title.
    pub fn validate_header(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        Ok(())
    }

    /// Validates the header, requires at least one question, and validates each one.
    ///
    /// # Errors
    ///
    /// Returns the first `DraftError` found.
    pub fn validate(&self) -> Result<(), DraftError> {
        self.validate_header()?;
        if self.questions.is_empty() {
            return Err(DraftError::NoQuestions);
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.questions.iter().filter(|q| q.needs_save()).count()
    }
}
