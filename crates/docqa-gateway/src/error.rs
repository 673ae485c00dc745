use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docqa_core::RagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("server error: {0}")]
    Server(String),
}

/// Handler failure rendered as `{"detail": ...}`.
#[derive(Debug)]
pub(crate) struct ApiError(pub RagError);

impl From<RagError> for ApiError {
    fn from(e: RagError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            RagError::EmptyQuestion => (
                StatusCode::BAD_REQUEST,
                "Question cannot be empty".to_owned(),
            ),
            e => {
                tracing::error!("request failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
