#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use assess_core::model::{
    Assessment, AssessmentId, AttemptResult, AttemptSubmission, Creator, Question, QuestionId,
    ResultId, UserId,
};
use services::{ApiError, AssessmentApi, NewAssessment, Notice, Notifier, QuestionInput};

pub fn build_assessment(id: u64, questions: u64) -> Assessment {
    let questions = (1..=questions)
        .map(|q| {
            Question::new(
                QuestionId::new(q),
                format!("Question {q}"),
                vec!["a".into(), "b".into(), "c".into()],
            )
        })
        .collect();
    Assessment::new(
        AssessmentId::new(id),
        "Rust fundamentals",
        None,
        questions,
        None,
        Creator {
            id: UserId::new(1),
            name: "Ferris".into(),
        },
    )
    .unwrap()
}

fn server_error(message: Option<String>) -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message,
    }
}

/// In-process backend that records every call.
pub struct FakeApi {
    assessment: Option<Assessment>,
    result: Mutex<AttemptResult>,
    submit_failures: Mutex<VecDeque<Option<String>>>,
    failing_questions: Mutex<Vec<String>>,
    next_id: AtomicU64,
    pub submissions: Mutex<Vec<AttemptSubmission>>,
    pub created_assessments: Mutex<Vec<NewAssessment>>,
    pub updated_assessments: Mutex<Vec<(AssessmentId, NewAssessment)>>,
    pub created_questions: Mutex<Vec<(AssessmentId, QuestionInput)>>,
    pub updated_questions: Mutex<Vec<(AssessmentId, QuestionId, QuestionInput)>>,
}

impl FakeApi {
    pub fn new(assessment: Option<Assessment>) -> Self {
        Self {
            assessment,
            result: Mutex::new(AttemptResult {
                id: Some(ResultId::new(500)),
                score: Some(100.0),
                is_passed: Some(true),
            }),
            submit_failures: Mutex::new(VecDeque::new()),
            failing_questions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(100),
            submissions: Mutex::new(Vec::new()),
            created_assessments: Mutex::new(Vec::new()),
            updated_assessments: Mutex::new(Vec::new()),
            created_questions: Mutex::new(Vec::new()),
            updated_questions: Mutex::new(Vec::new()),
        }
    }

    pub fn set_result(&self, result: AttemptResult) {
        *self.result.lock().unwrap() = result;
    }

    /// Make the next submit call fail with the given server message.
    pub fn fail_next_submit(&self, message: Option<&str>) {
        self.submit_failures
            .lock()
            .unwrap()
            .push_back(message.map(str::to_owned));
    }

    pub fn fail_question(&self, text: &str) {
        self.failing_questions.lock().unwrap().push(text.to_owned());
    }

    pub fn clear_question_failures(&self) {
        self.failing_questions.lock().unwrap().clear();
    }

    pub fn submit_calls(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn last_submission(&self) -> AttemptSubmission {
        self.submissions.lock().unwrap().last().cloned().unwrap()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl AssessmentApi for FakeApi {
    async fn fetch_assessment_for_taker(&self, id: AssessmentId) -> Result<Assessment, ApiError> {
        match &self.assessment {
            Some(a) if a.id() == id => Ok(a.clone()),
            _ => Err(ApiError::NotFound),
        }
    }

    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<AttemptResult, ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        if let Some(message) = self.submit_failures.lock().unwrap().pop_front() {
            return Err(server_error(message));
        }
        Ok(self.result.lock().unwrap().clone())
    }

    async fn create_assessment(&self, input: &NewAssessment) -> Result<AssessmentId, ApiError> {
        self.created_assessments.lock().unwrap().push(input.clone());
        Ok(AssessmentId::new(self.next_id()))
    }

    async fn update_assessment(
        &self,
        assessment_id: AssessmentId,
        input: &NewAssessment,
    ) -> Result<(), ApiError> {
        self.updated_assessments
            .lock()
            .unwrap()
            .push((assessment_id, input.clone()));
        Ok(())
    }

    async fn create_question(
        &self,
        assessment_id: AssessmentId,
        input: &QuestionInput,
    ) -> Result<QuestionId, ApiError> {
        if self
            .failing_questions
            .lock()
            .unwrap()
            .contains(&input.question)
        {
            return Err(server_error(Some("question rejected".into())));
        }
        self.created_questions
            .lock()
            .unwrap()
            .push((assessment_id, input.clone()));
        Ok(QuestionId::new(self.next_id()))
    }

    async fn update_question(
        &self,
        assessment_id: AssessmentId,
        question_id: QuestionId,
        input: &QuestionInput,
    ) -> Result<(), ApiError> {
        self.updated_questions
            .lock()
            .unwrap()
            .push((assessment_id, question_id, input.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
