//! Market data service backed by CryptoCompare

use coinstat::config::Settings;
use coinstat::services::{data_router, CryptoCompareClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 5001;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    coinstat::logging::init();

    let settings = Settings::from_env()?;
    if settings.cryptocompare_api_key.is_none() {
        tracing::warn!("CRYPTOCOMPARE_API_KEY not set, using the anonymous rate limit");
    }
    let source =
        CryptoCompareClient::new(settings.cryptocompare_api_key.clone(), settings.timeout);

    let app = data_router(Arc::new(source), settings.assets.clone())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port_or(DEFAULT_PORT)));
    tracing::info!("Data service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
