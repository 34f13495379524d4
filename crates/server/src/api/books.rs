//! Book API handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bookshelf_core::{Book, CatalogError, CatalogStats, IndexedBook, NewBook, SearchField};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub term: Option<String>,
    /// title, author or genre (default: title)
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<IndexedBook>,
    pub total: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn catalog_error(e: CatalogError) -> ApiError {
    match e {
        CatalogError::Validation(_) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        other => {
            error!("Catalog operation failed: {}", other);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn not_found(index: i64) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("No book at index {}", index))
}

/// Malformed request bodies and paths are 400s, kept apart from the 422 a
/// well-formed but invalid book gets.
fn rejection_error(status: StatusCode, message: String) -> ApiError {
    let status = if status == StatusCode::UNPROCESSABLE_ENTITY {
        StatusCode::BAD_REQUEST
    } else {
        status
    };
    api_error(status, message)
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    rejection_error(rejection.status(), rejection.body_text())
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    rejection_error(rejection.status(), rejection.body_text())
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    rejection_error(rejection.status(), rejection.body_text())
}

/// Negative indices never address a book.
fn to_index(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/books
///
/// List every book in catalog order.
pub async fn list_books(State(state): State<Arc<AppState>>) -> Json<BookListResponse> {
    let books = state.catalog().list();
    let total = books.len();
    Json(BookListResponse { books, total })
}

/// POST /api/v1/books
///
/// Validate and append a book.
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(json_rejection)?;
    let book = state.catalog().add(body).map_err(catalog_error)?;
    info!("Added \"{}\" by {}", book.title, book.author);
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /api/v1/books/{index}
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    index: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, ApiError> {
    let Path(index) = index.map_err(path_rejection)?;
    to_index(index)
        .and_then(|i| state.catalog().get(i))
        .map(Json)
        .ok_or_else(|| not_found(index))
}

/// DELETE /api/v1/books/{index}
///
/// Remove a book; later books shift down by one.
pub async fn remove_book(
    State(state): State<Arc<AppState>>,
    index: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, ApiError> {
    let Path(index) = index.map_err(path_rejection)?;
    let Some(i) = to_index(index) else {
        return Err(not_found(index));
    };

    match state.catalog().remove(i).map_err(catalog_error)? {
        Some(removed) => {
            info!("Removed \"{}\" from index {}", removed.title, i);
            Ok(Json(removed))
        }
        None => Err(not_found(index)),
    }
}

/// POST /api/v1/books/{index}/toggle
///
/// Flip a book between read and unread.
pub async fn toggle_read_status(
    State(state): State<Arc<AppState>>,
    index: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, ApiError> {
    let Path(index) = index.map_err(path_rejection)?;
    let Some(i) = to_index(index) else {
        return Err(not_found(index));
    };

    state
        .catalog()
        .toggle_read_status(i)
        .map_err(catalog_error)?
        .map(Json)
        .ok_or_else(|| not_found(index))
}

/// GET /api/v1/books/search?term=...&field=title|author|genre
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<BookListResponse>, ApiError> {
    let Query(params) = params.map_err(query_rejection)?;
    let field = match params.field.as_deref() {
        None | Some("") => SearchField::default(),
        Some(raw) => raw
            .parse::<SearchField>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
    };

    let books = state
        .catalog()
        .search(params.term.as_deref().unwrap_or_default(), field);
    let total = books.len();
    Ok(Json(BookListResponse { books, total }))
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<CatalogStats> {
    Json(state.catalog().statistics())
}
