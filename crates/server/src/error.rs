//! API error responses.

use algorithm::TsError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use backtest::BacktestError;
use data::DataError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by handlers, rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Market data could not be obtained
    #[error(transparent)]
    Data(#[from] DataError),

    /// Backtest, scoring or projection failed
    #[error(transparent)]
    Backtest(#[from] BacktestError),

    /// A model rejected its input or failed to fit
    #[error(transparent)]
    Model(#[from] TsError),

    /// Unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Data(DataError::NoData) => StatusCode::NOT_FOUND,
            ApiError::Data(DataError::InvalidDate(_) | DataError::InvalidInterval(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Data(_) => StatusCode::BAD_GATEWAY,
            ApiError::Backtest(BacktestError::ModelFit(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Backtest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Model(
                TsError::InsufficientData { .. }
                | TsError::InvalidParameter { .. }
                | TsError::InvalidData(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, %detail, "request failed");
        } else {
            tracing::warn!(%status, %detail, "request rejected");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
