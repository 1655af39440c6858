//! HTTP routes

pub mod ingest;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::response::StatusResponse;

/// Build the application router
pub fn router(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(status))
        .route(
            "/ingest/file",
            post(ingest::ingest_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ingest/url", post(ingest::ingest_url))
        .route("/ask", post(query::ask))
}

/// GET / - liveness check
async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
