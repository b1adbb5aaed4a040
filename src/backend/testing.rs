//! Mock backend for testing
//!
//! Queued responses per operation plus call counters, so pipeline tests can
//! assert which steps actually ran.

use super::{
    stats, BackendClient, PricePoint, PriceRecord, PriceSeries, RenderError, StatsError,
    StatsResult, UpstreamError,
};
use crate::artifact::{key_for, ArtifactKey};
use crate::market::{Currency, HistoryQuery, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct CallCounts {
    pub latest: AtomicUsize,
    pub history: AtomicUsize,
    pub stats: AtomicUsize,
    pub render: AtomicUsize,
}

impl CallCounts {
    pub fn snapshot(&self) -> [usize; 4] {
        [
            self.latest.load(Ordering::SeqCst),
            self.history.load(Ordering::SeqCst),
            self.stats.load(Ordering::SeqCst),
            self.render.load(Ordering::SeqCst),
        ]
    }
}

/// Backend returning queued results. With nothing queued it answers with
/// the two-candle fixture series, local stats and a successful render.
#[derive(Default)]
pub struct RecordingBackend {
    latest: Mutex<VecDeque<Result<f64, UpstreamError>>>,
    history: Mutex<VecDeque<Result<Vec<PriceRecord>, UpstreamError>>>,
    stats: Mutex<VecDeque<Result<StatsResult, StatsError>>>,
    render: Mutex<VecDeque<Result<(), RenderError>>>,
    pub calls: CallCounts,
    /// `issued_at` values passed to `render_plot`
    pub rendered_at: Mutex<Vec<DateTime<Utc>>>,
    /// Series passed to `compute_stats` and `render_plot`
    pub seen_series: Mutex<Vec<PriceSeries>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_latest(&self, result: Result<f64, UpstreamError>) {
        self.latest.lock().unwrap().push_back(result);
    }

    pub fn queue_history(&self, result: Result<Vec<PriceRecord>, UpstreamError>) {
        self.history.lock().unwrap().push_back(result);
    }

    pub fn queue_stats(&self, result: Result<StatsResult, StatsError>) {
        self.stats.lock().unwrap().push_back(result);
    }

    pub fn queue_render(&self, result: Result<(), RenderError>) {
        self.render.lock().unwrap().push_back(result);
    }
}

pub fn fixture_records() -> Vec<PriceRecord> {
    vec![
        PriceRecord {
            time: 1_700_000_000,
            high: 12.0,
            low: 8.0,
            open: Some(9.0),
            close: 10.0,
        },
        PriceRecord {
            time: 1_700_086_400,
            high: 22.0,
            low: 18.0,
            open: Some(19.0),
            close: 20.0,
        },
    ]
}

#[async_trait]
impl BackendClient for RecordingBackend {
    async fn fetch_latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, UpstreamError> {
        self.calls.latest.fetch_add(1, Ordering::SeqCst);
        let price = self.latest.lock().unwrap().pop_front().unwrap_or(Ok(64_250.5))?;
        Ok(PricePoint {
            symbol: symbol.clone(),
            currency: currency.clone(),
            price,
        })
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> Result<PriceSeries, UpstreamError> {
        self.calls.history.fetch_add(1, Ordering::SeqCst);
        let records = self
            .history
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(fixture_records()))?;
        if records.is_empty() {
            return Err(UpstreamError::EmptySeries {
                symbol: query.symbol.to_string(),
            });
        }
        Ok(PriceSeries::new(
            query.symbol.clone(),
            query.granularity,
            query.currency.clone(),
            records,
        ))
    }

    async fn compute_stats(&self, series: &PriceSeries) -> Result<StatsResult, StatsError> {
        self.calls.stats.fetch_add(1, Ordering::SeqCst);
        self.seen_series.lock().unwrap().push(series.clone());
        self.stats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| stats::compute(&series.records))
    }

    async fn render_plot(
        &self,
        series: &PriceSeries,
        issued_at: DateTime<Utc>,
    ) -> Result<ArtifactKey, RenderError> {
        self.calls.render.fetch_add(1, Ordering::SeqCst);
        self.seen_series.lock().unwrap().push(series.clone());
        self.rendered_at.lock().unwrap().push(issued_at);
        self.render.lock().unwrap().pop_front().unwrap_or(Ok(()))?;
        Ok(key_for(&series.symbol, series.granularity, issued_at))
    }
}
