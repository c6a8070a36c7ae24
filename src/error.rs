// src/error.rs
// API-level error taxonomy. Each variant maps to a distinct HTTP status so
// callers can tell "fix your request" from "retry later".
//
// Search failures never appear here: the orchestrator absorbs them into a
// degraded (empty) search bundle. Malformed LLM output is repaired by the
// normalizer and never surfaces as an error either.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::analyze::llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("LLM API key is not configured")]
    LlmConfig,

    #[error("LLM service error: {0}")]
    LlmService(String),

    #[error("LLM rate limit exceeded, try again later")]
    LlmRateLimited,

    #[error("news upstream error: {0}")]
    News(String),
}

#[derive(serde::Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::LlmConfig => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::LlmService(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::LlmRateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::News(_) => StatusCode::BAD_GATEWAY,
        };
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingKey => ApiError::LlmConfig,
            LlmError::RateLimited => ApiError::LlmRateLimited,
            LlmError::Upstream(msg) => ApiError::LlmService(msg),
            LlmError::EmptyResponse => ApiError::LlmService("empty completion".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        let cases = [
            (ApiError::InvalidInput("x".into()), 400),
            (ApiError::LlmConfig, 500),
            (ApiError::LlmService("x".into()), 503),
            (ApiError::LlmRateLimited, 429),
            (ApiError::News("x".into()), 502),
        ];
        for (err, want) in cases {
            let resp = err.into_response();
            assert_eq!(resp.status().as_u16(), want);
        }
    }

    #[test]
    fn llm_errors_map_to_distinct_api_kinds() {
        assert!(matches!(
            ApiError::from(LlmError::MissingKey),
            ApiError::LlmConfig
        ));
        assert!(matches!(
            ApiError::from(LlmError::RateLimited),
            ApiError::LlmRateLimited
        ));
        assert!(matches!(
            ApiError::from(LlmError::EmptyResponse),
            ApiError::LlmService(_)
        ));
    }
}
