//! Backing file status handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bookshelf_core::LoadOutcome;
use serde::Serialize;
use tracing::warn;

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogStatusResponse {
    /// Backing file location.
    pub path: String,
    /// What the last load found.
    pub outcome: LoadOutcome,
    /// Books currently held in memory.
    pub total: usize,
}

fn status_response(state: &AppState, outcome: LoadOutcome) -> CatalogStatusResponse {
    CatalogStatusResponse {
        path: state.catalog_path().display().to_string(),
        outcome,
        total: state.catalog().len(),
    }
}

/// GET /api/v1/catalog/status
///
/// Report the last load outcome so a UI can warn after a recovery.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<CatalogStatusResponse> {
    Json(status_response(&state, state.load_outcome()))
}

/// POST /api/v1/catalog/reload
///
/// Discard the in-memory catalog and read the backing file again.
pub async fn reload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogStatusResponse>, impl IntoResponse> {
    match state.reload() {
        Ok(outcome) => {
            if outcome.is_recovered() {
                warn!("Reload recovered from an unreadable catalog file");
            }
            Ok(Json(status_response(&state, outcome)))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
