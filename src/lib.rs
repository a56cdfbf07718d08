pub mod api;
pub mod app;
pub mod collector;
pub mod config;
pub mod error;
pub mod input;
pub mod logger;
pub mod models;
pub mod pitch;
pub mod quiz;
pub mod study;
pub mod ui;

// Re-exports for convenience
pub use api::{DojoClient, LearningService};
pub use collector::AnswerCollector;
pub use error::{ApiError, SessionError, SessionResult};
pub use models::{Answer, AppState, QuizQuestion, QuizResult, StudyItem};
pub use quiz::{QuizSession, QuizState};
pub use study::{StudySession, StudyState};
