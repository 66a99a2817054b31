#![forbid(unsafe_code)]

pub mod api;
pub mod drafts;
pub mod error;
pub mod notify;
pub mod session;
pub mod timer;

pub use assess_core::Clock;

pub use api::{ApiConfig, AssessmentApi, HttpAssessmentApi, NewAssessment, QuestionInput};
pub use drafts::{DraftAuthoringService, DraftSession};
pub use error::{ApiError, DraftServiceError, SessionError};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use session::{
    AssessmentSession, AssessmentSessionService, Route, SessionConfig, SessionProgress,
    SubmitKind, SubmitOutcome,
};
pub use timer::{CountdownTimer, TimerEvent, TimerEvents};
