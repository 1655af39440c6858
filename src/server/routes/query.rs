//! Question-answering endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::query::AskRequest;
use crate::types::response::AskResponse;

/// POST /ask - answer a question from the stored chunks
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    tracing::info!("question: \"{}\"", request.question);

    let answer = state.query_engine().ask(&request.question).await?;

    tracing::info!(
        "answered in {}ms with {} sources",
        start.elapsed().as_millis(),
        answer.sources.len()
    );

    Ok(Json(AskResponse {
        answer: answer.answer,
        sources: answer.sources,
    }))
}
