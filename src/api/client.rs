use crate::api::service::LearningService;
use crate::config::DojoConfig;
use crate::error::ApiError;
use crate::logger;
use crate::models::{LearnerStats, QuestionPrompt, QuizQuestion, QuizResult, StudyItem};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for the dojo API.
#[derive(Debug, Clone)]
pub struct DojoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConfirmRequest<'a> {
    word: &'a str,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    question_id: &'a str,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Question as it appears on the wire, before variant checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub question_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub kana: Option<String>,
    #[serde(default)]
    pub romaji: Option<String>,
}

impl TryFrom<QuestionPayload> for QuizQuestion {
    type Error = ApiError;

    fn try_from(payload: QuestionPayload) -> Result<Self, Self::Error> {
        let prompt = QuestionPrompt {
            question_id: payload.question_id,
            prompt_text: payload.question_text,
            word: payload.word,
            kana: payload.kana,
            romaji: payload.romaji,
        };
        match payload.kind.as_str() {
            "multiple_choice" => Ok(QuizQuestion::MultipleChoice {
                options: require_options(payload.options, &payload.kind)?,
                prompt,
            }),
            "input" => Ok(QuizQuestion::Input { prompt }),
            "assemble" => Ok(QuizQuestion::Assemble {
                tokens: require_options(payload.options, &payload.kind)?,
                prompt,
            }),
            other => Err(ApiError::Decode(format!("unknown question type `{}`", other))),
        }
    }
}

fn require_options(options: Option<Vec<String>>, kind: &str) -> Result<Vec<String>, ApiError> {
    match options {
        Some(options) if options.iter().any(|o| o.trim().is_empty()) => Err(ApiError::Decode(
            format!("`{}` question with a blank option", kind),
        )),
        Some(options) if !options.is_empty() => Ok(options),
        _ => Err(ApiError::Decode(format!(
            "`{}` question without options",
            kind
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPayload {
    pub correct: bool,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub xp_gained: u32,
    #[serde(default)]
    pub gems_awarded: u32,
}

impl TryFrom<ResultPayload> for QuizResult {
    type Error = ApiError;

    fn try_from(payload: ResultPayload) -> Result<Self, Self::Error> {
        if payload.correct_answers.is_empty() {
            return Err(ApiError::Decode(
                "result without correct answers".to_string(),
            ));
        }
        Ok(QuizResult {
            correct: payload.correct,
            correct_answers: payload.correct_answers,
            explanation: payload.explanation,
            xp_gained: payload.xp_gained,
            gems_awarded: payload.gems_awarded,
        })
    }
}

impl DojoClient {
    pub fn new(config: &DojoConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        logger::log(&format!("API error HTTP {}: {}", status, body));
        Err(status_error(status, body))
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, ApiError> {
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::Decode(format!("{}\nRaw: {}", e, text))
        })
    }
}

/// A 404 carries the server's `{detail}` message (or the raw body) as
/// `NotFound`; every other failure status is passed through.
fn status_error(status: StatusCode, body: String) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        let detail = serde_json::from_str::<ErrorDetail>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        return ApiError::NotFound(detail);
    }
    ApiError::Status {
        code: status.as_u16(),
        body,
    }
}

#[async_trait]
impl LearningService for DojoClient {
    async fn fetch_study_queue(&self) -> Result<Vec<StudyItem>, ApiError> {
        let response = self.send(self.client.get(self.url("/study"))).await?;
        Self::decode(response).await
    }

    async fn confirm_study_item(&self, word: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("/study/confirm"))
            .json(&ConfirmRequest { word });
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_quiz_question(&self) -> Result<QuizQuestion, ApiError> {
        let response = self.send(self.client.get(self.url("/quiz/vocab"))).await?;
        let payload: QuestionPayload = Self::decode(response).await?;
        QuizQuestion::try_from(payload)
    }

    async fn submit_quiz_answer(
        &self,
        question_id: &str,
        answer: &str,
    ) -> Result<QuizResult, ApiError> {
        let request = self
            .client
            .post(self.url("/quiz/answer"))
            .json(&AnswerRequest {
                question_id,
                answer,
            });
        let response = self.send(request).await?;
        let payload: ResultPayload = Self::decode(response).await?;
        QuizResult::try_from(payload)
    }

    async fn fetch_learner_stats(&self) -> Result<LearnerStats, ApiError> {
        let response = self.send(self.client.get(self.url("/user"))).await?;
        Self::decode(response).await
    }
}
