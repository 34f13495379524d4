//! Common test utilities for driving the router in-process.
//!
//! The fixture builds a real `JsonCatalog` in a temporary directory, so every
//! request exercises the same persistence path as the running server.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use bookshelf_core::{BookCatalog, Config, JsonCatalog, StorageConfig};
use bookshelf_server::state::AppState;

/// In-process server backed by a catalog file in a temp directory.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Location of the backing file
    pub library_path: PathBuf,
    /// Temporary directory holding the backing file
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with no backing file yet.
    pub fn new() -> Self {
        Self::with_file_contents(None)
    }

    /// Create a fixture whose backing file starts with `contents`.
    pub fn with_file_contents(contents: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let library_path = temp_dir.path().join("library.json");
        if let Some(contents) = contents {
            std::fs::write(&library_path, contents).expect("Failed to seed library file");
        }

        let config = Config {
            storage: StorageConfig {
                path: library_path.clone(),
                ..Default::default()
            },
            ..Default::default()
        };

        let (catalog, outcome) =
            JsonCatalog::open(&config.storage).expect("Failed to open catalog");
        let catalog: Arc<dyn BookCatalog> = Arc::new(catalog);
        let state = Arc::new(AppState::new(config, catalog, outcome));
        let router = bookshelf_server::api::create_router(state);

        Self {
            router,
            library_path,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Add a book through the API, asserting it was created.
    pub async fn add_book(&self, title: &str, author: &str, genre: &str, read: bool) -> Value {
        let response = self
            .post(
                "/api/v1/books",
                json!({
                    "title": title,
                    "author": author,
                    "publication_year": 1990,
                    "genre": genre,
                    "read_status": read,
                }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "add_book failed: {}",
            response.body
        );
        response.body
    }

    /// Parse the backing file as it currently is on disk.
    pub fn library_file(&self) -> Value {
        let data = std::fs::read_to_string(&self.library_path).expect("library file missing");
        serde_json::from_str(&data).expect("library file is not JSON")
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
