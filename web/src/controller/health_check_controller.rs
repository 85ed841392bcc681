use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET whether the API router is up
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
    ),
    tag = "meeting_summarizer"
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}
