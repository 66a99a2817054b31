use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AnswerEntry, AssessmentId, ResultId};

/// Lifecycle of a single attempt. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Submitted,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Submitted)
    }
}

/// Body of the attempt submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSubmission {
    pub assessment_id: AssessmentId,
    pub answers: Vec<AnswerEntry>,
    pub started_at: DateTime<Utc>,
}

/// Graded attempt as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    #[serde(default)]
    pub id: Option<ResultId>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_passed: Option<bool>,
}
