//! Liveness and readiness probes.

use crate::routes::run_blocking;
use crate::AppState;
use algorithm::regression::Arima;
use algorithm::reservoir::{EchoStateNetwork, EsnConfig};
use algorithm::Predictor;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// Outcome of one readiness check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub healthy: bool,
    pub message: String,
}

impl CheckResult {
    fn from_outcome(name: &'static str, outcome: algorithm::Result<()>) -> Self {
        match outcome {
            Ok(()) => Self {
                name,
                healthy: true,
                message: "ok".to_string(),
            },
            Err(e) => Self {
                name,
                healthy: false,
                message: e.to_string(),
            },
        }
    }
}

/// Fit and run a small echo state network and an ARIMA model.
fn check_algorithms() -> Vec<CheckResult> {
    let series: Vec<f64> = (0..40).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect();

    let esn = EchoStateNetwork::new(EsnConfig::default().with_reservoir_size(20)).and_then(
        |mut model| {
            model.fit(&series)?;
            model.predict(1).map(|_| ())
        },
    );
    let mut arima = Arima::default();
    let arima = arima.fit(&series).and_then(|_| arima.predict(1).map(|_| ()));

    vec![
        CheckResult::from_outcome("echo_state_network", esn),
        CheckResult::from_outcome("arima", arima),
    ]
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - can the forecasting models run?
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let checks = run_blocking(|| Ok(check_algorithms()))
        .await
        .unwrap_or_else(|e| {
            vec![CheckResult {
                name: "algorithms",
                healthy: false,
                message: e.to_string(),
            }]
        });

    let healthy = checks.iter().all(|c| c.healthy);
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "version": env!("CARGO_PKG_VERSION"),
            "data_source": state.source.name(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "duration_ms": started.elapsed().as_millis() as u64,
            "checks": checks
        })),
    )
}
