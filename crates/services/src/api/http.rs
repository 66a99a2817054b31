use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use assess_core::model::{
    Assessment, AssessmentId, AttemptResult, AttemptSubmission, QuestionId,
};

use super::dto::{AssessmentDto, Envelope, ErrorBody, IdDto, SubmitResponse};
use super::{AssessmentApi, NewAssessment, QuestionInput};
use crate::error::ApiError;

/// Where the backend lives and how to authenticate against it.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attach a bearer token; blank tokens are ignored.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

/// `AssessmentApi` over the REST backend.
#[derive(Clone)]
pub struct HttpAssessmentApi {
    client: Client,
    config: ApiConfig,
}

impl HttpAssessmentApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, parse_error_message(&body)))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AssessmentApi for HttpAssessmentApi {
    async fn fetch_assessment_for_taker(&self, id: AssessmentId) -> Result<Assessment, ApiError> {
        let request = self.client.get(self.url(&format!("assessments/{id}/take")));
        let dto: Envelope<AssessmentDto> = self.send_json(request).await?;
        dto.into_inner()
            .into_assessment()
            .map_err(|err| ApiError::InvalidPayload(err.into()))
    }

    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<AttemptResult, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("assessments/{}/submit", submission.assessment_id)))
            .json(submission);
        let body: Envelope<SubmitResponse> = self.send_json(request).await?;
        Ok(body.into_inner().result)
    }

    async fn create_assessment(&self, input: &NewAssessment) -> Result<AssessmentId, ApiError> {
        let request = self.client.post(self.url("assessments")).json(input);
        let body: Envelope<IdDto<AssessmentId>> = self.send_json(request).await?;
        Ok(body.into_inner().id)
    }

    async fn update_assessment(
        &self,
        assessment_id: AssessmentId,
        input: &NewAssessment,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(&format!("assessments/{assessment_id}")))
            .json(input);
        self.send(request).await?;
        Ok(())
    }

    async fn create_question(
        &self,
        assessment_id: AssessmentId,
        input: &QuestionInput,
    ) -> Result<QuestionId, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("assessments/{assessment_id}/questions")))
            .json(input);
        let body: Envelope<IdDto<QuestionId>> = self.send_json(request).await?;
        Ok(body.into_inner().id)
    }

    async fn update_question(
        &self,
        assessment_id: AssessmentId,
        question_id: QuestionId,
        input: &QuestionInput,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(&format!(
                "assessments/{assessment_id}/questions/{question_id}"
            )))
            .json(input);
        self.send(request).await?;
        Ok(())
    }
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
}

fn error_for_status(status: StatusCode, message: Option<String>) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::Validation(message.unwrap_or_else(|| "invalid request".to_owned()))
        }
        _ => ApiError::Status { status, message },
    }
}
