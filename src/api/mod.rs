pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ScreenerConfig;
use crate::gateway::{self, MarketDataGateway};

use state::AppState;

/// Routes of the dashboard server.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(|| async { "ok" }))
        // JSON
        .route("/api/tickers", get(handlers::screen::list_tickers))
        .route("/api/screen", get(handlers::screen::screen))
        // HTML
        .route("/", get(handlers::dashboard::dashboard))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(
    config: ScreenerConfig,
    gateway: Arc<dyn MarketDataGateway>,
    host: &str,
    port: u16,
) -> Result<()> {
    let app = router(AppState::new(config, gateway));

    let addr = format!("{host}:{port}");
    println!("options-screener dashboard listening on {addr}");
    println!("  Dashboard: GET  http://{addr}/");
    println!("  Tickers:   GET  http://{addr}/api/tickers");
    println!("  Screen:    GET  http://{addr}/api/screen?tickers=AAPL,MSFT");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    info!(%addr, "server started");

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}

/// Run the serve command. `host` and `port` override the `[server]` section.
pub fn run(config: ScreenerConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let gateway = gateway::from_config(&config.gateway).context("creating market data gateway")?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(serve(config, gateway, &host, port))
}
