use crate::error::ApiError;
use crate::models::{LearnerStats, QuizQuestion, QuizResult, StudyItem};
use async_trait::async_trait;

/// The remote operations the session controllers consume.
///
/// The current track is implicit on the server side. An empty study queue
/// is a successful response; the absence of reviewable items is reported
/// by `fetch_quiz_question` as [`ApiError::NotFound`].
#[async_trait]
pub trait LearningService: Send + Sync {
    async fn fetch_study_queue(&self) -> Result<Vec<StudyItem>, ApiError>;

    /// Idempotent, safe to retry.
    async fn confirm_study_item(&self, word: &str) -> Result<(), ApiError>;

    async fn fetch_quiz_question(&self) -> Result<QuizQuestion, ApiError>;

    /// One-shot per `question_id`.
    async fn submit_quiz_answer(
        &self,
        question_id: &str,
        answer: &str,
    ) -> Result<QuizResult, ApiError>;

    async fn fetch_learner_stats(&self) -> Result<LearnerStats, ApiError> {
        Err(ApiError::NotFound("learner stats unavailable".to_string()))
    }
}

#[cfg(test)]
pub use stub::StubService;
