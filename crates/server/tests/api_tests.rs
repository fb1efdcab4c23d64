//! Router tests against an in-memory data source

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use data::{InMemorySource, Quote};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{create_app, AppState, ServerConfig};
use tower::ServiceExt;

/// 2023-01-01T00:00:00Z
const START: i64 = 1672531200;

fn daily_quotes(n: usize) -> Vec<Quote> {
    (0..n)
        .map(|i| {
            let close = 100.0 + 0.2 * i as f64 + 3.0 * (i as f64 * 0.15).sin();
            let volume = 1_000_000 + (i as u64 % 7) * 50_000;
            Quote::new(
                START + i as i64 * 86_400,
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                close - 0.25,
                volume,
            )
        })
        .collect()
}

fn app() -> Router {
    let source = InMemorySource::new()
        .with_quotes("AAPL", daily_quotes(260))
        .with_quotes("TINY", daily_quotes(20));
    create_app(AppState::new(source), &ServerConfig::default())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn stock_body(symbol: &str, split: f64) -> Value {
    json!({
        "stock_symbol": symbol,
        "start_date": "2023-01-01",
        "end_date": "2024-12-31",
        "interval": "1d",
        "split_percentage": split
    })
}

fn wave(n: usize) -> Vec<f64> {
    (0..n).map(|i| 50.0 + (i as f64 * 0.2).sin()).collect()
}

#[tokio::test]
async fn test_liveness() {
    for uri in ["/health", "/health/live"] {
        let (status, json) = get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "alive");
        assert!(json["version"].is_string());
    }
}

#[tokio::test]
async fn test_readiness() {
    let (status, json) = get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["data_source"], "memory");
    assert_eq!(json["checks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_grab_data() {
    let (status, json) = post(
        "/grab_data",
        json!({
            "symbol": "AAPL",
            "start_date": "2023-01-01",
            "end_date": "2023-01-11",
            "intervals": "1d"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let closes = json["result"].as_array().unwrap();
    assert_eq!(closes.len(), 10);
    assert_eq!(closes[0].as_f64().unwrap(), daily_quotes(1)[0].close);
}

#[tokio::test]
async fn test_grab_data_unknown_symbol() {
    let (status, json) = post(
        "/grab_data",
        json!({
            "symbol": "NOPE",
            "start_date": "2023-01-01",
            "end_date": "2023-02-01",
            "intervals": "1d"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Data not found");
}

#[tokio::test]
async fn test_grab_data_bad_interval_and_date() {
    let (status, json) = post(
        "/grab_data",
        json!({
            "symbol": "AAPL",
            "start_date": "2023-01-01",
            "end_date": "2023-02-01",
            "intervals": "2d"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("2d"));

    let (status, _) = post(
        "/grab_data",
        json!({
            "symbol": "AAPL",
            "start_date": "2023-02-30",
            "end_date": "2023-03-01",
            "intervals": "1d"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_run_echo() {
    let (status, json) = post(
        "/run_echo",
        json!({ "data": wave(220), "reservoir_size": 20, "window": 4 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predictions"].as_array().unwrap().len(), 100);
    let forecasts = json["forecasts"].as_array().unwrap();
    assert_eq!(forecasts.len(), 100);
    assert!(forecasts.iter().all(|row| row.as_array().unwrap().len() == 4));
    assert!(json["mse"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_run_echo_short_series() {
    let (status, json) = post(
        "/run_echo",
        json!({ "data": wave(50), "reservoir_size": 20 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"], "Insufficient data: required 200, got 50");
}

#[tokio::test]
async fn test_future_pred() {
    let (status, json) = post(
        "/future_pred",
        json!({ "data": wave(130), "reservoir_size": 20, "window": 7 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_oversized_echo_requests_rejected() {
    let bodies = [
        json!({ "data": wave(130), "reservoir_size": 20, "window": 1u64 << 40 }),
        json!({ "data": wave(130), "reservoir_size": 300_000 }),
    ];
    for uri in ["/future_pred", "/run_echo"] {
        for body in &bodies {
            let (status, json) = post(uri, body.clone()).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri} {body}");
            assert!(json["detail"].as_str().unwrap().contains("at most"));
        }
    }
}

#[tokio::test]
async fn test_run_linear_regression() {
    let (status, json) = post("/run_linear_regression", stock_body("AAPL", 0.8)).await;

    assert_eq!(status, StatusCode::OK);
    // floor(260 * 0.8) = 208 training days
    assert_eq!(json["predictions"].as_array().unwrap().len(), 52);
    assert_eq!(json["expected"].as_array().unwrap().len(), 52);
    assert!(json["mse"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_run_arima_default_split() {
    let mut body = stock_body("AAPL", 0.0);
    body.as_object_mut().unwrap().remove("split_percentage");
    let (status, json) = post("/run_arima", body).await;

    assert_eq!(status, StatusCode::OK);
    // floor(260 * 0.66) = 171 training points
    assert_eq!(json["predictions"].as_array().unwrap().len(), 89);
    assert_eq!(json["expected"].as_array().unwrap().len(), 89);
}

#[tokio::test]
async fn test_run_arima_short_series() {
    let (status, _) = post("/run_arima", stock_body("TINY", 0.66)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_run_rf() {
    let (status, json) = post("/run_rf", stock_body("AAPL", 0.7)).await;

    assert_eq!(status, StatusCode::OK);
    let predictions = json["predictions"].as_array().unwrap();
    let actual = json["actual_values"].as_array().unwrap();
    // 61 usable days, 30% held out
    assert_eq!(predictions.len(), 19);
    assert_eq!(actual.len(), 19);
    assert!(json["mse"].as_f64().unwrap() >= 0.0);
    assert!(json["r2"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_run_rf_short_series() {
    let (status, _) = post("/run_rf", stock_body("TINY", 0.7)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_mse() {
    let (status, json) = post(
        "/mse",
        json!({ "prediction": [1.0, 2.0, 3.0], "actual": [1.0, 2.0, 4.0] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((json["result"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);

    let (status, json) = post(
        "/mse",
        json!({ "prediction": [1.0, 2.0], "actual": [1.0] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"], "Length mismatch: 2 vs 1");
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let (status, _) = post("/run_linear_regression", json!({ "stock_symbol": "AAPL" })).await;
    assert!(status.is_client_error());
}
