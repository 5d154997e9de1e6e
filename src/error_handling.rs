// ============================================================================
// Error Handling - One Error Type for the Whole Inquiry Pipeline
// ============================================================================
//
// Every failure the pipeline can observe is normalized into `InquiryError`
// exactly once, at the transport boundary (see `services::inquiry_api_client`).
// Callers never have to dig through ad-hoc shapes for a message.
//
// Message priority when a request fails:
//
// 1. `message` (then `error`) from the response envelope
// 2. Display text of the transport error
// 3. Raw text body, when the server did not answer with JSON
// 4. The per-operation fallback passed to `user_message`
//
// ============================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InquiryError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error: {message}")]
    Server { message: String, code: Option<u16> },

    #[error("An inquiry submission is already in progress")]
    SubmissionInFlight,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl InquiryError {
    /// The string surfaced to users, falling back when nothing specific is known.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            InquiryError::Validation(errors) => errors.join("; "),
            InquiryError::Transport(message) => message.clone(),
            InquiryError::Server { message, .. } => message.clone(),
            InquiryError::SubmissionInFlight => self.to_string(),
            InquiryError::Config(message) => message.clone(),
        };

        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }

    /// HTTP status attached to a server-side failure, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            InquiryError::Server { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InquiryError {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("HTTP transport error: {:?}", err);
        InquiryError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for InquiryError {
    fn from(err: url::ParseError) -> Self {
        InquiryError::Config(format!("Invalid API URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, InquiryError>;
