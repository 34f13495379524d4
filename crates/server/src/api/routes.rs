use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{books, catalog, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/genres", get(handlers::list_genres))
        // Books
        .route("/books", get(books::list_books).post(books::add_book))
        .route("/books/search", get(books::search_books))
        .route(
            "/books/{index}",
            get(books::get_book).delete(books::remove_book),
        )
        .route("/books/{index}/toggle", post(books::toggle_read_status))
        .route("/stats", get(books::get_stats))
        // Backing file
        .route("/catalog/status", get(catalog::get_status))
        .route("/catalog/reload", post(catalog::reload))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
}
