//! Statistics over posted price series

use coinstat::config::Settings;
use coinstat::services::analytics_router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 5002;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    coinstat::logging::init();

    let settings = Settings::from_env()?;
    let app = analytics_router().layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port_or(DEFAULT_PORT)));
    tracing::info!("Analytics service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
