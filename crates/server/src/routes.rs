//! API route handlers

use crate::error::ApiError;
use crate::schema::{
    ArimaRequest, EchoRequest, EchoResponse, ForestResponse, GrabDataRequest, HoldoutResponse,
    MseRequest, ScalarResponse, SeriesResponse, StockRequest,
};
use crate::{service, AppState};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// Run a blocking unit of work on tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

pub async fn grab_data(
    State(state): State<AppState>,
    Json(req): Json<GrabDataRequest>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let source = Arc::clone(&state.source);
    let result = run_blocking(move || service::grab_data(source.as_ref(), &req)).await?;
    Ok(Json(SeriesResponse { result }))
}

pub async fn run_echo(Json(req): Json<EchoRequest>) -> Result<Json<EchoResponse>, ApiError> {
    let response = run_blocking(move || service::run_echo(&req)).await?;
    Ok(Json(response))
}

pub async fn future_pred(Json(req): Json<EchoRequest>) -> Result<Json<SeriesResponse>, ApiError> {
    let result = run_blocking(move || service::future_pred(&req)).await?;
    Ok(Json(SeriesResponse { result }))
}

pub async fn run_linear_regression(
    State(state): State<AppState>,
    Json(req): Json<StockRequest>,
) -> Result<Json<HoldoutResponse>, ApiError> {
    let source = Arc::clone(&state.source);
    let response =
        run_blocking(move || service::run_linear_regression(source.as_ref(), &req)).await?;
    Ok(Json(response))
}

pub async fn run_arima(
    State(state): State<AppState>,
    Json(req): Json<ArimaRequest>,
) -> Result<Json<HoldoutResponse>, ApiError> {
    let source = Arc::clone(&state.source);
    let response = run_blocking(move || service::run_arima(source.as_ref(), &req)).await?;
    Ok(Json(response))
}

pub async fn run_rf(
    State(state): State<AppState>,
    Json(req): Json<StockRequest>,
) -> Result<Json<ForestResponse>, ApiError> {
    let source = Arc::clone(&state.source);
    let response = run_blocking(move || service::run_rf(source.as_ref(), &req)).await?;
    Ok(Json(response))
}

pub async fn mse(Json(req): Json<MseRequest>) -> Result<Json<ScalarResponse>, ApiError> {
    let result = service::mse(&req)?;
    Ok(Json(ScalarResponse { result }))
}
