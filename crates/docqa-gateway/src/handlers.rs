use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use docqa_core::{ConfigSummary, QueryAnswer};

use super::error::ApiError;
use super::server::AppState;

#[derive(serde::Deserialize)]
pub(crate) struct QueryRequest {
    pub question: String,
}

#[derive(serde::Serialize)]
struct StatusResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    uptime_secs: u64,
}

#[derive(serde::Serialize)]
struct IngestResponse {
    status: &'static str,
    message: &'static str,
    documents: usize,
    chunks: usize,
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        message: "RAG system is running",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub(crate) async fn config_handler(State(state): State<AppState>) -> Json<ConfigSummary> {
    Json(state.service.config_summary())
}

pub(crate) async fn setup_index_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.setup_index().await?;
    Ok(Json(StatusResponse {
        status: "success",
        message: "Search index created successfully",
    }))
}

pub(crate) async fn ingest_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let _guard = state.ingest_lock.lock().await;
    let report = state.service.ingest().await?;
    Ok(Json(IngestResponse {
        status: "success",
        message: "Documents ingested successfully",
        documents: report.documents,
        chunks: report.chunks,
    }))
}

pub(crate) async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryAnswer>, ApiError> {
    let answer = state.service.query(&request.question).await?;
    Ok(Json(answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy",
            message: "RAG system is running",
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn query_request_deserializes() {
        let payload: QueryRequest =
            serde_json::from_str(r#"{"question":"What is the leave policy?"}"#).unwrap();
        assert_eq!(payload.question, "What is the leave policy?");
    }

    #[test]
    fn query_request_requires_question() {
        assert!(serde_json::from_str::<QueryRequest>("{}").is_err());
    }
}
