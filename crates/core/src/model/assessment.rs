use std::collections::HashSet;

use thiserror::Error;

use crate::model::{AssessmentId, BadgeId, QuestionId, UserId};

/// Minimum number of options a multiple-choice question must offer.
pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment title cannot be empty")]
    EmptyTitle,

    #[error("question {id} has {count} options, at least two are required")]
    TooFewOptions { id: QuestionId, count: usize },

    #[error("question {id} appears more than once")]
    DuplicateQuestion { id: QuestionId },
}

/// A single multiple-choice question as presented to a taker.
///
/// The correct answer is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id,
            text: text.into(),
            options,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub icon: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub id: UserId,
    pub name: String,
}

/// An assessment fetched for a taking session. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    id: AssessmentId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    badge: Option<Badge>,
    creator: Creator,
}

impl Assessment {
    /// Build an assessment, checking option counts and question id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` if the title is blank, a question offers fewer
    /// than two options, or two questions share an id.
    pub fn new(
        id: AssessmentId,
        title: impl Into<String>,
        description: Option<String>,
        questions: Vec<Question>,
        badge: Option<Badge>,
        creator: Creator,
    ) -> Result<Self, AssessmentError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(AssessmentError::EmptyTitle);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if question.options.len() < MIN_OPTIONS {
                return Err(AssessmentError::TooFewOptions {
                    id: question.id,
                    count: question.options.len(),
                });
            }
            if !seen.insert(question.id) {
                return Err(AssessmentError::DuplicateQuestion { id: question.id });
            }
        }

        Ok(Self {
            id,
            title,
            description: description.filter(|d| !d.trim().is_empty()),
            questions,
            badge,
            creator,
        })
    }

    #[must_use]
    pub fn id(&self) -> AssessmentId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    #[must_use]
    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    #[must_use]
    pub fn creator(&self) -> &Creator {
        &self.creator
    }
}
