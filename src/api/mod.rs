//! REST API over the dispatch pricer.
//!
//! Provides four GET endpoints:
//! - `/price` prices one snapshot from query parameters
//! - `/sweep` prices a demand range
//! - `/chart/{kind}` returns a default chart spec
//! - `/config` returns the active configuration

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::CalculatorConfig;
use crate::market::pricer::DispatchPricer;

pub use types::{ErrorResponse, PriceQuery, PriceResponse, SweepQuery};

/// Immutable application state shared across all request handlers.
pub struct AppState {
    /// Configuration whose sliders bound every request.
    pub config: CalculatorConfig,
    /// Pricer built from `config.generators`.
    pub pricer: DispatchPricer,
}

impl AppState {
    pub fn new(config: CalculatorConfig) -> Self {
        let pricer = DispatchPricer::new(config.generators);
        Self { config, pricer }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/price", get(handlers::get_price))
        .route("/sweep", get(handlers::get_sweep))
        .route("/chart/{kind}", get(handlers::get_chart))
        .route("/config", get(handlers::get_config))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
