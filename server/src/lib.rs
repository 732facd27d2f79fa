//! Exchange Server
//!
//! HTTP surface over the exchange engine: rate lookup, conversion and the
//! currency list.

pub mod config;
pub mod routes;

use axum::Router;
use exchange_fx::ExchangeEngine;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine serving every request.
    pub engine: ExchangeEngine,
}

impl AppState {
    /// Create state around an engine.
    pub fn new(engine: ExchangeEngine) -> Self {
        Self { engine }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
