use axum::{extract::State, http::StatusCode, http::Uri, Json};
use bookshelf_core::{Config, Genre};
use serde::Serialize;
use std::sync::Arc;

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct GenresResponse {
    pub genres: Vec<&'static str>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Config> {
    Json(state.config().clone())
}

/// GET /api/v1/genres
///
/// Genre labels accepted by `POST /books`, in form order.
pub async fn list_genres() -> Json<GenresResponse> {
    Json(GenresResponse {
        genres: Genre::ALL.iter().map(Genre::label).collect(),
    })
}

/// Unmatched routes get the same error body as handler failures.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("No route for {}", uri.path()),
        }),
    )
}
