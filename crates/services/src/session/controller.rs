use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use assess_core::model::{
    AnswerSet, Assessment, AttemptResult, AttemptSubmission, Question, QuestionId, SessionState,
};
use assess_core::{QuestionNavigator, Severity, format_time};

use super::progress::SessionProgress;
use super::{Route, SessionConfig, SubmitKind, SubmitOutcome};
use crate::Clock;
use crate::api::AssessmentApi;
use crate::error::SessionError;
use crate::notify::{Notice, Notifier};
use crate::timer::{CountdownTimer, TimerEvent, TimerEvents};

const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit assessment. Please try again.";

//
// ─── ATTEMPT CONTROLLER ────────────────────────────────────────────────────────
//

/// One taker's attempt at an assessment.
///
/// Owns the answer set, the session state, and the countdown timer. It is the
/// only component that talks to the backend during the attempt. Dropping it
/// stops the timer.
pub struct AssessmentSession {
    assessment: Assessment,
    clock: Clock,
    config: SessionConfig,
    api: Arc<dyn AssessmentApi>,
    notifier: Arc<dyn Notifier>,
    answers: AnswerSet,
    navigator: QuestionNavigator,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    timer: Option<CountdownTimer>,
    time_expired: bool,
    result: Option<AttemptResult>,
}

impl AssessmentSession {
    pub(crate) fn new(
        assessment: Assessment,
        clock: Clock,
        config: SessionConfig,
        api: Arc<dyn AssessmentApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let navigator = QuestionNavigator::new(assessment.questions().len());
        Self {
            assessment,
            clock,
            config,
            api,
            notifier,
            answers: AnswerSet::new(),
            navigator,
            state: SessionState::NotStarted,
            started_at: None,
            timer: None,
            time_expired: false,
            result: None,
        }
    }

    #[must_use]
    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// True once the countdown reached zero, whether or not submission succeeded.
    #[must_use]
    pub fn is_time_expired(&self) -> bool {
        self.time_expired
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(CountdownTimer::is_running)
    }

    #[must_use]
    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.assessment.questions().get(self.navigator.current())
    }

    #[must_use]
    pub fn navigator(&self) -> &QuestionNavigator {
        &self.navigator
    }

    pub fn next_question(&mut self) -> bool {
        self.navigator.next()
    }

    pub fn previous_question(&mut self) -> bool {
        self.navigator.previous()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.timer
            .as_ref()
            .map_or(self.config.time_budget_secs, CountdownTimer::remaining)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let remaining_secs = self.remaining_secs();
        SessionProgress {
            state: self.state,
            current_index: self.navigator.current(),
            question_count: self.navigator.question_count(),
            answered: self.navigator.answered_count(&self.answers),
            completion_percent: self.navigator.completion_percent(),
            remaining_secs,
            remaining_display: format_time(remaining_secs),
            severity: Severity::classify(remaining_secs),
        }
    }

    /// Begin the attempt and start the countdown.
    ///
    /// Returns the timer's event stream, or `None` if the attempt was already
    /// started (the call is then a no-op). Expiry is only acted on through
    /// `handle_timer_event`, so the stream must be drained.
    #[must_use = "expiry is only submitted when the timer events are handled"]
    pub fn start(&mut self) -> Option<TimerEvents> {
        if self.state != SessionState::NotStarted {
            tracing::debug!(state = ?self.state, "start ignored");
            return None;
        }

        self.state = SessionState::InProgress;
        self.started_at = Some(self.clock.now());
        let (timer, events) =
            CountdownTimer::start(self.config.time_budget_secs, self.config.tick_period);
        self.timer = Some(timer);

        tracing::info!(
            assessment_id = %self.assessment.id(),
            budget_secs = self.config.time_budget_secs,
            "attempt started"
        );
        Some(events)
    }

    /// Select `option` for a question; the last selection wins.
    ///
    /// The option text is not checked against the question's options.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted`, `SessionError::AlreadySubmitted`, or
    /// `SessionError::TimeExpired` when answers cannot change, and
    /// `SessionError::UnknownQuestion` for an id outside this assessment.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::Submitted => return Err(SessionError::AlreadySubmitted),
            SessionState::InProgress => {}
        }
        if self.time_expired {
            return Err(SessionError::TimeExpired);
        }
        if self.assessment.question(question_id).is_none() {
            return Err(SessionError::UnknownQuestion(question_id));
        }

        self.answers.record(question_id, option);
        Ok(())
    }

    /// Send the answered questions to the backend.
    ///
    /// The state flips to `Submitted` before the request is sent, so a second
    /// call (manual or timer) returns `SubmitOutcome::Ignored` without another
    /// request. It is rolled back only if the request fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ValidationFailure` for a manual submit with no
    /// answers, `SessionError::SubmissionFailure` if the backend rejects the
    /// attempt, and `SessionError::NotStarted` before `start`.
    pub async fn submit(&mut self, kind: SubmitKind) -> Result<SubmitOutcome, SessionError> {
        match self.state {
            SessionState::Submitted => {
                tracing::debug!(?kind, "submission already in flight or done");
                return Ok(SubmitOutcome::Ignored);
            }
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::InProgress => {}
        }

        // After expiry every retry is treated as forced.
        let forced = kind == SubmitKind::Forced || self.time_expired;
        if !forced && self.answers.is_empty() {
            self.notifier.notify(Notice::error(
                "Please answer at least one question before submitting.",
            ));
            return Err(SessionError::ValidationFailure);
        }

        self.state = SessionState::Submitted;
        let submission = AttemptSubmission {
            assessment_id: self.assessment.id(),
            answers: self.answers.to_payload(self.assessment.questions()),
            started_at: self.started_at.unwrap_or_else(|| self.clock.now()),
        };
        tracing::info!(
            assessment_id = %submission.assessment_id,
            answered = submission.answers.len(),
            forced,
            "submitting attempt"
        );

        match self.api.submit_attempt(&submission).await {
            Ok(result) => {
                self.stop_timer();
                let route = result.id.map_or(Route::Dashboard, Route::Result);
                tracing::info!(%route, score = ?result.score, passed = ?result.is_passed, "attempt submitted");
                self.notifier
                    .notify(Notice::success("Assessment submitted successfully."));
                self.result = Some(result.clone());
                Ok(SubmitOutcome::Submitted { result, route })
            }
            Err(source) => {
                self.state = SessionState::InProgress;
                let message = source
                    .server_message()
                    .map_or_else(|| GENERIC_SUBMIT_FAILURE.to_owned(), ToOwned::to_owned);
                tracing::warn!(error = %source, forced, "submission failed");
                self.notifier.notify(Notice::error(message.clone()));
                Err(SessionError::SubmissionFailure { message, source })
            }
        }
    }

    /// React to the countdown. Expiry forces a submission.
    ///
    /// # Errors
    ///
    /// Propagates `submit` errors for the forced submission.
    pub async fn handle_timer_event(
        &mut self,
        event: TimerEvent,
    ) -> Result<Option<SubmitOutcome>, SessionError> {
        match event {
            TimerEvent::Tick { .. } => Ok(None),
            TimerEvent::Expired => {
                if self.state == SessionState::InProgress {
                    self.time_expired = true;
                    self.notifier
                        .notify(Notice::info("Time is up. Submitting your answers."));
                }
                self.submit(SubmitKind::Forced).await.map(Some)
            }
        }
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("assessment_id", &self.assessment.id())
            .field("questions_len", &self.assessment.questions().len())
            .field("answered", &self.answers.len())
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("time_expired", &self.time_expired)
            .finish_non_exhaustive()
    }
}
