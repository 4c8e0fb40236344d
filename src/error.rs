use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure taxonomy for generated insights and chat replies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InsightError {
    #[error("Network error: {cause}")]
    Network { cause: String },

    #[error("API request failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("No response generated")]
    EmptyResponse,

    #[error("Validation error: {0}")]
    Validation(String),
}

pub const INSIGHT_FALLBACK: &str =
    "Unable to generate insight. Please check your connection and try again.";
pub const CHAT_FALLBACK: &str =
    "I apologize, but I encountered an error. Please try again or rephrase your question.";

impl InsightError {
    /// Text safe to show in place of a generated insight.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            InsightError::Validation(_) => "Please enter a question to ask about your analytics.",
            _ => INSIGHT_FALLBACK,
        }
    }
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request already in flight for {0}")]
    Busy(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Busy(_) => StatusCode::CONFLICT,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
