//! Statistics over a price series
//!
//! Average and median come from closing prices; min and max from the lows
//! and highs. Values are rounded to three decimals.

use super::{PriceRecord, StatsError, StatsResult};

const PRECISION: f64 = 1000.0;

pub fn compute(records: &[PriceRecord]) -> Result<StatsResult, StatsError> {
    if records.is_empty() {
        return Err(StatsError::InvalidSeries);
    }
    let finite = records
        .iter()
        .all(|r| r.close.is_finite() && r.high.is_finite() && r.low.is_finite());
    if !finite {
        return Err(StatsError::InvalidSeries);
    }

    let mut closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    closes.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)] // series are at most a few thousand records
    let average = closes.iter().sum::<f64>() / closes.len() as f64;
    let mid = closes.len() / 2;
    let median = if closes.len() % 2 == 0 {
        (closes[mid - 1] + closes[mid]) / 2.0
    } else {
        closes[mid]
    };
    let min = records.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
    let max = records
        .iter()
        .map(|r| r.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let stats = StatsResult {
        average: round(average),
        median: round(median),
        min: round(min),
        max: round(max),
    };
    // Finite inputs near f64::MAX can still overflow in the sum or the rounding
    let overflowed = [stats.average, stats.median, stats.min, stats.max]
        .iter()
        .any(|v| !v.is_finite());
    if overflowed {
        return Err(StatsError::InvalidSeries);
    }
    Ok(stats)
}

fn round(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}
