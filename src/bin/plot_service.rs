//! Chart rendering into S3-compatible object storage

use coinstat::config::Settings;
use coinstat::services::plot_router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 5003;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    coinstat::logging::init();

    let settings = Settings::from_env()?;
    let store = settings.artifact_store()?;
    tracing::info!(
        endpoint = %settings.storage.endpoint,
        region = %settings.storage.region,
        "Charts go to object storage"
    );

    let app = plot_router(Arc::new(store), settings.assets.clone())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port_or(DEFAULT_PORT)));
    tracing::info!("Plot service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
