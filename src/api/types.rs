//! API response types

use crate::artifact::{format_issued_at, ArtifactKey};
use crate::backend::{PriceRecord, PriceSeries, StatsResult};
use crate::gateway::{ChartOutcome, RenderedChart, Report};
use crate::market::{Currency, Granularity, Symbol};
use serde::Serialize;

/// Response for `/history`
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub symbol: Symbol,
    pub granularity: Granularity,
    pub currency: Currency,
    pub records: Vec<PriceRecord>,
}

impl From<PriceSeries> for HistoryResponse {
    fn from(series: PriceSeries) -> Self {
        Self {
            symbol: series.symbol,
            granularity: series.granularity,
            currency: series.currency,
            records: series.records,
        }
    }
}

/// Chart status, as returned by `/plot` and inside `/report`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChartResponse {
    Success {
        #[serde(rename = "issuedAt")]
        issued_at: String,
        key: ArtifactKey,
    },
    Failed {
        #[serde(rename = "issuedAt")]
        issued_at: String,
        error: String,
    },
}

impl From<RenderedChart> for ChartResponse {
    fn from(chart: RenderedChart) -> Self {
        ChartResponse::Success {
            issued_at: format_issued_at(chart.issued_at),
            key: chart.key,
        }
    }
}

impl From<ChartOutcome> for ChartResponse {
    fn from(outcome: ChartOutcome) -> Self {
        match outcome {
            ChartOutcome::Rendered(chart) => chart.into(),
            ChartOutcome::Failed { issued_at, error } => ChartResponse::Failed {
                issued_at: format_issued_at(issued_at),
                error: error.to_string(),
            },
        }
    }
}

/// Response for `/report`
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub stats: StatsResult,
    pub chart: ChartResponse,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            stats: report.stats,
            chart: report.chart.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
