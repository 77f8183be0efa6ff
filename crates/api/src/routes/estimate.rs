//! Estimate preview shown in the chat.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::post,
};
use serde::Serialize;
use tracing::debug;
use zeno_core::estimate::RenderedEstimate;
use zeno_core::lead::LeadSubmission;

use super::read_json_object;
use crate::{AppState, error::ApiError};

/// Creates the estimate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/summarize", post(summarize))
}

/// Response for `/summarize`.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Always true.
    pub ok: bool,
    /// HTML fragment for the chat bubble.
    pub summary: String,
    /// Structured estimate.
    pub estimate: RenderedEstimate,
}

/// POST /summarize - Price the collected lead.
async fn summarize(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let document = read_json_object(body)?
        .filter(|document| !document.is_empty())
        .ok_or_else(|| ApiError::bad_request("No data received"))?;

    let lead = LeadSubmission::from_document(&document);
    let input = lead.budget_input();
    let estimate = state.engine.estimate(&input);

    debug!(category = %input.category, rows = estimate.rows.len(), "Rendered estimate");

    Ok(Json(SummaryResponse {
        ok: true,
        summary: estimate.html.clone(),
        estimate,
    }))
}
