use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure classes of a single search page fetch.
///
/// These never leave the retrieval engine as errors; the engine logs them and
/// records the kind on its state so callers can tell what happened.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    /// Non-success status or transport failure
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Success status but the body is not the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A record could not be normalized
    #[error("Parse exception: {0}")]
    ParseException(String),
}

/// Discriminant of [`RetrievalError`] without the message
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalErrorKind {
    UpstreamUnavailable,
    MalformedResponse,
    ParseException,
}

impl RetrievalError {
    pub fn kind(&self) -> RetrievalErrorKind {
        match self {
            RetrievalError::UpstreamUnavailable(_) => RetrievalErrorKind::UpstreamUnavailable,
            RetrievalError::MalformedResponse(_) => RetrievalErrorKind::MalformedResponse,
            RetrievalError::ParseException(_) => RetrievalErrorKind::ParseException,
        }
    }
}

impl From<RetrievalError> for AppError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::UpstreamUnavailable(msg) => AppError::ExternalApi(msg),
            RetrievalError::MalformedResponse(msg) | RetrievalError::ParseException(msg) => {
                AppError::ExternalApi(format!("Invalid upstream data: {}", msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_kind() {
        assert_eq!(
            RetrievalError::UpstreamUnavailable("500".to_string()).kind(),
            RetrievalErrorKind::UpstreamUnavailable
        );
        assert_eq!(
            RetrievalError::MalformedResponse("no results".to_string()).kind(),
            RetrievalErrorKind::MalformedResponse
        );
        assert_eq!(
            RetrievalError::ParseException("no title".to_string()).kind(),
            RetrievalErrorKind::ParseException
        );
    }

    #[test]
    fn test_retrieval_error_kind_serialization() {
        let json = serde_json::to_string(&RetrievalErrorKind::MalformedResponse).unwrap();
        assert_eq!(json, "\"malformed_response\"");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("session".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_failure_maps_to_bad_gateway() {
        let err: AppError = RetrievalError::UpstreamUnavailable("timeout".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
