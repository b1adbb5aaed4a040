//! Typed client for the backing services
//!
//! Three independent services sit behind the gateway: raw market data,
//! statistical analytics and chart rendering. Every call is bounded by the
//! same timeout and is attempted once.

mod error;
mod http;
pub mod stats;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::{RenderError, Service, StatsError, UpstreamError};
pub use http::{BackendEndpoints, HttpBackend};
pub use types::{PricePoint, PriceRecord, PriceSeries, StatsResult};

use crate::artifact::ArtifactKey;
use crate::market::{Currency, HistoryQuery, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Common interface for the backing services
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Latest quote for `symbol` in `currency`
    async fn fetch_latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, UpstreamError>;

    /// Historical candles. An empty answer is an error.
    async fn fetch_history(&self, query: &HistoryQuery) -> Result<PriceSeries, UpstreamError>;

    /// Summary statistics. Empty series are rejected before any call is made.
    async fn compute_stats(&self, series: &PriceSeries) -> Result<StatsResult, StatsError>;

    /// Render and store a chart of `series`, stamped with `issued_at`.
    /// Returns the key the image was stored under.
    async fn render_plot(
        &self,
        series: &PriceSeries,
        issued_at: DateTime<Utc>,
    ) -> Result<ArtifactKey, RenderError>;
}

#[async_trait]
impl<T: BackendClient + ?Sized> BackendClient for Arc<T> {
    async fn fetch_latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, UpstreamError> {
        (**self).fetch_latest(symbol, currency).await
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> Result<PriceSeries, UpstreamError> {
        (**self).fetch_history(query).await
    }

    async fn compute_stats(&self, series: &PriceSeries) -> Result<StatsResult, StatsError> {
        (**self).compute_stats(series).await
    }

    async fn render_plot(
        &self,
        series: &PriceSeries,
        issued_at: DateTime<Utc>,
    ) -> Result<ArtifactKey, RenderError> {
        (**self).render_plot(series, issued_at).await
    }
}

/// Logging wrapper for backend clients
pub struct LoggingBackend {
    inner: Arc<dyn BackendClient>,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn BackendClient>) -> Self {
        Self { inner }
    }
}

fn log_outcome<T, E: std::fmt::Display>(
    operation: &'static str,
    symbol: &Symbol,
    started: std::time::Instant,
    result: &Result<T, E>,
) {
    let duration = started.elapsed();
    match result {
        Ok(_) => tracing::info!(
            operation,
            symbol = %symbol,
            duration_ms = %duration.as_millis(),
            "Backend call completed"
        ),
        Err(e) => tracing::error!(
            operation,
            symbol = %symbol,
            duration_ms = %duration.as_millis(),
            error = %e,
            "Backend call failed"
        ),
    }
}

#[async_trait]
impl BackendClient for LoggingBackend {
    async fn fetch_latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, UpstreamError> {
        let start = std::time::Instant::now();
        let result = self.inner.fetch_latest(symbol, currency).await;
        log_outcome("fetch_latest", symbol, start, &result);
        result
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> Result<PriceSeries, UpstreamError> {
        let start = std::time::Instant::now();
        let result = self.inner.fetch_history(query).await;
        if let Ok(series) = &result {
            tracing::debug!(
                records = series.len(),
                granularity = %query.granularity,
                "History fetched"
            );
        }
        log_outcome("fetch_history", &query.symbol, start, &result);
        result
    }

    async fn compute_stats(&self, series: &PriceSeries) -> Result<StatsResult, StatsError> {
        let start = std::time::Instant::now();
        let result = self.inner.compute_stats(series).await;
        log_outcome("compute_stats", &series.symbol, start, &result);
        result
    }

    async fn render_plot(
        &self,
        series: &PriceSeries,
        issued_at: DateTime<Utc>,
    ) -> Result<ArtifactKey, RenderError> {
        let start = std::time::Instant::now();
        let result = self.inner.render_plot(series, issued_at).await;
        log_outcome("render_plot", &series.symbol, start, &result);
        result
    }
}

/// Local statistics, for deployments without an analytics service
pub struct LocalStats<B> {
    inner: B,
}

impl<B> LocalStats<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BackendClient> BackendClient for LocalStats<B> {
    async fn fetch_latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, UpstreamError> {
        self.inner.fetch_latest(symbol, currency).await
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> Result<PriceSeries, UpstreamError> {
        self.inner.fetch_history(query).await
    }

    async fn compute_stats(&self, series: &PriceSeries) -> Result<StatsResult, StatsError> {
        stats::compute(&series.records)
    }

    async fn render_plot(
        &self,
        series: &PriceSeries,
        issued_at: DateTime<Utc>,
    ) -> Result<ArtifactKey, RenderError> {
        self.inner.render_plot(series, issued_at).await
    }
}
