mod controller;
mod progress;
mod service;

use std::fmt;
use std::time::Duration;

use assess_core::model::{AttemptResult, ResultId};

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::AssessmentSession;
pub use progress::SessionProgress;
pub use service::AssessmentSessionService;

/// Default time allowed for one attempt.
pub const DEFAULT_TIME_BUDGET_SECS: u32 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub time_budget_secs: u32,
    pub tick_period: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            tick_period: Duration::from_secs(1),
        }
    }
}

/// What triggered a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    /// The taker pressed submit.
    Manual,
    /// The countdown ran out.
    Forced,
}

/// Where the taker goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Result(ResultId),
    Dashboard,
    AssessmentList,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Result(id) => write!(f, "/assessments/results/{id}"),
            Route::Dashboard => f.write_str("/dashboard"),
            Route::AssessmentList => f.write_str("/assessments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted { result: AttemptResult, route: Route },
    /// A submission already happened or is in flight; nothing was sent.
    Ignored,
}
