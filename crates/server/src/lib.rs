//! # server
//!
//! HTTP API for stock price forecasting: market data retrieval, echo state
//! network backtests and projections, ARIMA, linear regression and random
//! forest evaluations.

use axum::routing::{get, post};
use axum::Router;
use data::DataSource;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod health;
pub mod routes;
pub mod schema;
pub mod service;

pub use config::ServerConfig;
pub use error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Market data provider
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

/// Build the router with all endpoints and middleware.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::liveness))
        // Market data
        .route("/grab_data", post(routes::grab_data))
        // Forecasting
        .route("/run_echo", post(routes::run_echo))
        .route("/future_pred", post(routes::future_pred))
        .route("/run_linear_regression", post(routes::run_linear_regression))
        .route("/run_arima", post(routes::run_arima))
        .route("/run_rf", post(routes::run_rf))
        .route("/mse", post(routes::mse))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors_allow_any {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}
