//! PNG price trend charts
//!
//! Close prices over time as a line with a marker per candle. Nothing
//! textual is drawn, so no font backend is needed.

use crate::backend::PriceRecord;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;
const MARGIN: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("No data provided")]
    EmptySeries,
    #[error("series contains non-finite prices")]
    NonFinite,
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

fn draw_error(err: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(err.to_string())
}

/// Render close prices in time order as PNG bytes
pub fn render_png(records: &[PriceRecord]) -> Result<Vec<u8>, ChartError> {
    let mut points: Vec<(i64, f64)> = records.iter().map(|r| (r.time, r.close)).collect();
    points.sort_by_key(|(time, _)| *time);

    let (Some(&(first, _)), Some(&(last, _))) = (points.first(), points.last()) else {
        return Err(ChartError::EmptySeries);
    };
    if points.iter().any(|(_, close)| !close.is_finite()) {
        return Err(ChartError::NonFinite);
    }

    let low = points.iter().map(|(_, c)| *c).fold(f64::INFINITY, f64::min);
    let high = points
        .iter()
        .map(|(_, c)| *c)
        .fold(f64::NEG_INFINITY, f64::max);
    // A flat or single-point series still needs a non-empty range on both axes
    let pad = if high > low {
        (high - low) * 0.05
    } else {
        low.abs().max(1.0) * 0.05
    };
    let x_range = first..last.max(first.saturating_add(1));
    let y_range = (low - pad)..(high + pad);
    if !y_range.start.is_finite() || !y_range.end.is_finite() {
        return Err(ChartError::NonFinite);
    }

    let mut pixels = vec![0u8; WIDTH as usize * HEIGHT as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_error)?;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
            .map_err(draw_error)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 4, BLUE.filled())),
            )
            .map_err(draw_error)?;
        root.present().map_err(draw_error)?;
    }

    let image = RgbImage::from_raw(WIDTH, HEIGHT, pixels)
        .ok_or_else(|| ChartError::Encode("pixel buffer does not match size".to_string()))?;
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| ChartError::Encode(e.to_string()))?;
    Ok(png.into_inner())
}
