//! stockcast HTTP server

use anyhow::Context;
use data::YahooFinance;
use server::{create_app, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,backtest=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let source = YahooFinance::new().with_base_url(&config.yahoo_base_url);
    let app = create_app(AppState::new(source), &config);

    let addr = config.addr()?;
    tracing::info!(
        "stockcast server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
