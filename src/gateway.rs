//! Request orchestration over the backing services
//!
//! Pipelines are strictly sequential and attempted once. A history fetch
//! failure short-circuits everything after it. A report fetches history
//! once and hands the same series to both the statistics and the render
//! step, so the numbers and the chart always describe identical data.

mod clock;
mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::GatewayError;

use crate::artifact::ArtifactKey;
use crate::backend::{BackendClient, PricePoint, PriceSeries, RenderError, StatsResult};
use crate::market::{Currency, HistoryQuery, Symbol};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A chart that was rendered and stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub key: ArtifactKey,
    /// The instant the render was requested. The key is derived from it.
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Rendered(RenderedChart),
    /// Statistics are still valid; only the image is missing
    Failed {
        issued_at: DateTime<Utc>,
        error: RenderError,
    },
}

impl ChartOutcome {
    pub fn rendered(&self) -> Option<&RenderedChart> {
        match self {
            ChartOutcome::Rendered(chart) => Some(chart),
            ChartOutcome::Failed { .. } => None,
        }
    }
}

/// Statistics plus chart over one fetched series
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub stats: StatsResult,
    pub chart: ChartOutcome,
}

pub struct Gateway<B> {
    backend: B,
    clock: Arc<dyn Clock>,
}

impl<B: BackendClient> Gateway<B> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    pub fn with_clock(backend: B, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub async fn latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, GatewayError> {
        self.backend
            .fetch_latest(symbol, currency)
            .await
            .map_err(GatewayError::from_fetch)
    }

    pub async fn history(&self, query: &HistoryQuery) -> Result<PriceSeries, GatewayError> {
        self.backend
            .fetch_history(query)
            .await
            .map_err(GatewayError::from_fetch)
    }

    /// Fetch history, then compute statistics over it
    pub async fn stats(&self, query: &HistoryQuery) -> Result<StatsResult, GatewayError> {
        let series = self.history(query).await?;
        self.backend
            .compute_stats(&series)
            .await
            .map_err(GatewayError::from_stats)
    }

    /// Fetch history, then render it. The returned `issued_at` is the one
    /// the key was derived from; callers must not read their own clock.
    pub async fn plot(&self, query: &HistoryQuery) -> Result<RenderedChart, GatewayError> {
        let series = self.history(query).await?;
        let issued_at = self.clock.now();
        let key = self
            .backend
            .render_plot(&series, issued_at)
            .await
            .map_err(GatewayError::from_render)?;
        Ok(RenderedChart { key, issued_at })
    }

    /// Fetch once, compute statistics, then render the same series.
    ///
    /// A render failure does not fail the report: the statistics are
    /// returned with `ChartOutcome::Failed`.
    pub async fn report(&self, query: &HistoryQuery) -> Result<Report, GatewayError> {
        let series = self.history(query).await?;
        let stats = self
            .backend
            .compute_stats(&series)
            .await
            .map_err(GatewayError::from_stats)?;

        let issued_at = self.clock.now();
        let chart = match self.backend.render_plot(&series, issued_at).await {
            Ok(key) => ChartOutcome::Rendered(RenderedChart { key, issued_at }),
            Err(error) => {
                tracing::warn!(
                    symbol = %query.symbol,
                    granularity = %query.granularity,
                    error = %error,
                    "Chart render failed, returning statistics only"
                );
                ChartOutcome::Failed { issued_at, error }
            }
        };
        Ok(Report { stats, chart })
    }
}
