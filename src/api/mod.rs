pub mod client;
pub mod service;

pub use client::{DojoClient, QuestionPayload, ResultPayload};
pub use service::LearningService;
