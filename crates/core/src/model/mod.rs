mod answers;
mod assessment;
mod attempt;
mod draft;
mod ids;

pub use ids::{AssessmentId, BadgeId, ParseIdError, QuestionId, ResultId, UserId};

pub use answers::{AnswerEntry, AnswerSet};
pub use assessment::{Assessment, AssessmentError, Badge, Creator, MIN_OPTIONS, Question};
pub use attempt::{AttemptResult, AttemptSubmission, SessionState};
pub use draft::{AssessmentDraft, DraftError, QuestionDraft};
