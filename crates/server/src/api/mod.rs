pub mod books;
pub mod catalog;
pub mod handlers;
pub mod routes;

pub use routes::create_router;

use serde::Serialize;

/// JSON body returned with every non-2xx response, including malformed
/// requests and unknown routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
