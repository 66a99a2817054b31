use std::sync::Arc;

use assess_core::model::AssessmentId;

use super::SessionConfig;
use super::controller::AssessmentSession;
use crate::Clock;
use crate::api::AssessmentApi;
use crate::error::SessionError;
use crate::notify::{Notice, Notifier, TracingNotifier};

/// Loads assessments and hands out attempt controllers.
#[derive(Clone)]
pub struct AssessmentSessionService {
    clock: Clock,
    config: SessionConfig,
    api: Arc<dyn AssessmentApi>,
    notifier: Arc<dyn Notifier>,
}

impl AssessmentSessionService {
    #[must_use]
    pub fn new(clock: Clock, config: SessionConfig, api: Arc<dyn AssessmentApi>) -> Self {
        Self {
            clock,
            config,
            api,
            notifier: Arc::new(TracingNotifier),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Fetch the assessment and build a not-started attempt.
    ///
    /// A single attempt is made. On failure the user is notified and the
    /// returned error redirects away from the flow.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::FetchFailure` if the assessment cannot be loaded.
    pub async fn load(&self, assessment_id: AssessmentId) -> Result<AssessmentSession, SessionError> {
        match self.api.fetch_assessment_for_taker(assessment_id).await {
            Ok(assessment) => {
                tracing::info!(
                    %assessment_id,
                    questions = assessment.questions().len(),
                    "assessment loaded"
                );
                Ok(AssessmentSession::new(
                    assessment,
                    self.clock,
                    self.config,
                    Arc::clone(&self.api),
                    Arc::clone(&self.notifier),
                ))
            }
            Err(source) => {
                tracing::error!(%assessment_id, error = %source, "failed to load assessment");
                self.notifier
                    .notify(Notice::error(format!("Failed to load assessment: {source}")));
                Err(SessionError::FetchFailure {
                    assessment_id,
                    source,
                })
            }
        }
    }
}
