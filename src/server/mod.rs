/// HTTP server setup
pub mod server;

/// Request handlers
pub mod routes;

/// Request and response bodies
pub mod types;

/// Error responses
pub mod error;

pub use error::ApiError;
pub use server::{router, ApiServer, AppState};
