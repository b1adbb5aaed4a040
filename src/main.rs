//! coinstat gateway
//!
//! Fronts the data, analytics and plot services with one HTTP surface.

use coinstat::api::{create_router, AppState};
use coinstat::config::Settings;
use coinstat::gateway::Gateway;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    coinstat::logging::init();

    let settings = Settings::from_env()?;
    let port = settings.port_or(DEFAULT_PORT);
    tracing::info!(
        assets = ?settings.assets.iter().map(ToString::to_string).collect::<Vec<_>>(),
        data = %settings.endpoints.data,
        analytics = %settings.endpoints.analytics,
        plot = %settings.endpoints.plot,
        local_analytics = settings.local_analytics,
        timeout_secs = settings.timeout.as_secs(),
        "Gateway configured"
    );

    let state = AppState::new(Gateway::new(settings.backend()), settings.assets.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("coinstat gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
