use serde::Deserialize;

use assess_core::model::{
    Assessment, AssessmentError, AssessmentId, AttemptResult, Badge, BadgeId, Creator, Question,
    QuestionId, UserId,
};

/// Backend responses come either wrapped in `{ "data": ... }` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(super) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct IdDto<T> {
    pub id: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct SubmitResponse {
    pub result: AttemptResult,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AssessmentDto {
    pub id: AssessmentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
    #[serde(default)]
    pub badge: Option<BadgeDto>,
    pub creator: CreatorDto,
}

/// Any correct-answer field the backend might include is ignored here.
#[derive(Debug, Deserialize)]
pub(super) struct QuestionDto {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BadgeDto {
    pub id: BadgeId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatorDto {
    pub id: UserId,
    pub name: String,
}

impl AssessmentDto {
    pub(super) fn into_assessment(self) -> Result<Assessment, AssessmentError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| Question::new(q.id, q.question, q.options))
            .collect();
        let badge = self.badge.map(|b| Badge {
            id: b.id,
            name: b.name,
            icon: b.icon,
            category: b.category,
        });
        Assessment::new(
            self.id,
            self.title,
            self.description,
            questions,
            badge,
            Creator {
                id: self.creator.id,
                name: self.creator.name,
            },
        )
    }
}
