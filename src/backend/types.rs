//! Market data exchanged with the backing services

use crate::market::{Currency, Granularity, Symbol};
use serde::{Deserialize, Serialize};

/// Latest quote for one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub symbol: Symbol,
    pub currency: Currency,
    pub price: f64,
}

/// One candle as returned by the data service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Unix seconds
    pub time: i64,
    pub high: f64,
    pub low: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    pub close: f64,
}

/// Candles for one symbol at one granularity, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub granularity: Granularity,
    pub currency: Currency,
    pub records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn new(
        symbol: Symbol,
        granularity: Granularity,
        currency: Currency,
        mut records: Vec<PriceRecord>,
    ) -> Self {
        records.sort_by_key(|r| r.time);
        Self {
            symbol,
            granularity,
            currency,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Summary statistics over a series, rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}
