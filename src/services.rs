//! Backing services that ship with the gateway
//!
//! The data service proxies the upstream price API, the analytics service
//! computes statistics and the plot service renders charts into object
//! storage.

mod analytics;
mod chart;
mod cryptocompare;
mod data;
mod plot;

pub use analytics::analytics_router;
pub use chart::{render_png, ChartError};
pub use cryptocompare::{CryptoCompareClient, DataSourceError};
pub use data::{data_router, PriceSource};
pub use plot::plot_router;

use crate::api::ErrorResponse;
use crate::artifact::StorageError;
use crate::market::MarketError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug)]
enum ServiceError {
    BadRequest(String),
    Internal(String),
}

impl From<MarketError> for ServiceError {
    fn from(err: MarketError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

impl From<DataSourceError> for ServiceError {
    fn from(err: DataSourceError) -> Self {
        tracing::error!(error = %err, "Price source failed");
        ServiceError::Internal(err.to_string())
    }
}

impl From<ChartError> for ServiceError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::EmptySeries | ChartError::NonFinite => {
                ServiceError::BadRequest(err.to_string())
            }
            ChartError::Draw(_) | ChartError::Encode(_) => {
                tracing::error!(error = %err, "Chart rendering failed");
                ServiceError::Internal(err.to_string())
            }
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Chart upload failed");
        ServiceError::Internal(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::data::tests::StubSource;
    use super::*;
    use crate::artifact::{ArtifactStore, MemoryArtifactStore};
    use crate::backend::{stats, BackendEndpoints, HttpBackend};
    use crate::conversation::Conversation;
    use crate::gateway::Gateway;
    use crate::market::{test_assets, Granularity, HistoryQuery};
    use crate::token::TokenCodec;
    use std::sync::Arc;
    use std::time::Duration;

    async fn spawn(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    async fn bundled_backend(store: Arc<MemoryArtifactStore>) -> HttpBackend {
        HttpBackend::new(
            BackendEndpoints {
                data: spawn(data_router(Arc::new(StubSource), test_assets())).await,
                analytics: spawn(analytics_router()).await,
                plot: spawn(plot_router(store, test_assets())).await,
            },
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn gateway_reads_the_bundled_services() {
        let store = Arc::new(MemoryArtifactStore::new());
        let gateway = Gateway::new(bundled_backend(store.clone()).await);
        let btc = test_assets().resolve("BTC").unwrap();
        let usd = "USD".parse().unwrap();

        let point = gateway.latest(&btc, &usd).await.unwrap();
        assert!((point.price - 64_250.5).abs() < f64::EPSILON);

        let query = HistoryQuery::new(btc, Granularity::Day, usd, 10).unwrap();
        let series = gateway.history(&query).await.unwrap();
        let remote = gateway.stats(&query).await.unwrap();
        assert_eq!(remote, stats::compute(&series.records).unwrap());

        let chart = gateway.plot(&query).await.unwrap();
        let png = store.fetch(&chart.key).await.unwrap();
        assert!(png.starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn conversation_downloads_the_chart_the_plot_service_stored() {
        let store = Arc::new(MemoryArtifactStore::new());
        let gateway = Gateway::new(bundled_backend(store.clone()).await);
        let conversation = Conversation::new(
            gateway,
            store,
            TokenCodec::new(test_assets()),
            "USD".parse().unwrap(),
            10,
        )
        .unwrap();

        let reply = conversation.handle_callback("ETH_hour").await;
        assert!(reply.text.starts_with("ETH statistics for 10 hours:"), "{}", reply.text);
        assert!(!reply.text.contains("Chart unavailable"), "{}", reply.text);
        let chart = reply.chart.as_ref().unwrap();
        assert_eq!(chart.filename, "ETH_hour.png");
        assert!(chart.bytes.starts_with(b"\x89PNG"));
    }
}
