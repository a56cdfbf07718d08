use thiserror::Error;

/// Failures of a request to the dojo API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Everything a session controller or answer collector can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("nothing to learn right now")]
    EmptyQueue,

    #[error("no reviewable items: {0}")]
    NoReviewableItems(String),

    #[error("request failed: {0}")]
    Transport(#[from] ApiError),

    #[error("answer not ready: {0}")]
    Validation(String),

    #[error("`{op}` is not allowed while {state}")]
    State { op: &'static str, state: String },

    #[error("response discarded, request is no longer current")]
    Superseded,
}

impl SessionError {
    pub(crate) fn state(op: &'static str, state: impl Into<String>) -> Self {
        SessionError::State {
            op,
            state: state.into(),
        }
    }

    /// Terminal outcomes end the session; everything else leaves it retryable.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionError::EmptyQueue | SessionError::NoReviewableItems(_)
        )
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
