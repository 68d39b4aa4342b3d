//! HTTP API endpoints.
//!
//! The hand-off endpoint is consumed by the reveal screen after `start`;
//! the rest exists for the setup UI and for operators.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::handoff::HANDOFF_KEY;
use crate::state::AppState;

/// Fetch the finalized session snapshot.
///
/// GET /api/handoff
///
/// 404 until a session has been started.
pub async fn get_handoff(State(state): State<Arc<AppState>>) -> Response {
    match state.handoff.get(HANDOFF_KEY).await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (StatusCode::NOT_FOUND, "no finalized session").into_response(),
    }
}

/// List selectable categories in discovery order.
///
/// GET /api/categories
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.categories().map(String::from).collect())
}

/// Operational status for the running server.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// "external" or "fallback"
    pub catalog_origin: &'static str,
    pub categories: usize,
    pub session_version: u64,
    pub players: usize,
}

/// GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let view = state.session_view().await;
    Json(StatusResponse {
        catalog_origin: state.catalog.origin().as_str(),
        categories: state.catalog.len(),
        session_version: view.version,
        players: view.player_names.len(),
    })
}
