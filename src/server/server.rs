use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::pipelines::sequence_classification::Classify;

use super::routes;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    /// The classifier built at startup
    pub classifier: Arc<dyn Classify>,
}

impl AppState {
    /// Wrap a loaded classifier
    pub fn new(classifier: Arc<dyn Classify>) -> Self {
        Self { classifier }
    }
}

/// Build the application router. Cross-origin requests are allowed from any origin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(routes::predict))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// API Server for handling classification requests
pub struct ApiServer {
    state: AppState,
    host: String,
    port: u16,
}

impl ApiServer {
    /// Create a server around an already loaded classifier
    pub fn new(classifier: Arc<dyn Classify>, host: String, port: u16) -> Self {
        info!("Creating new API server on {}:{}", host, port);

        Self {
            state: AppState::new(classifier),
            host,
            port,
        }
    }

    /// Bind the listener and serve until the process exits
    pub async fn start(self) -> std::io::Result<()> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;

        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, router(self.state)).await
    }
}
