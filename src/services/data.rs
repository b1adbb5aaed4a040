//! Market data service
//!
//! Proxies the upstream price API in the wire format the gateway reads:
//! `/latest` answers `{ "<SYMBOL>": "<price> <CURRENCY>" }` and `/history`
//! answers a bare array of candles.

use super::{DataSourceError, ServiceError};
use crate::backend::PriceRecord;
use crate::market::{AssetList, Currency, Granularity, HistoryQuery, Symbol};
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Upstream price data
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn latest_price(&self, symbol: &Symbol, currency: &Currency)
        -> Result<f64, DataSourceError>;

    async fn history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, DataSourceError>;
}

#[derive(Clone)]
struct DataState {
    source: Arc<dyn PriceSource>,
    assets: AssetList,
}

pub fn data_router(source: Arc<dyn PriceSource>, assets: AssetList) -> Router {
    Router::new()
        .route("/latest/:symbol/:currency", get(latest))
        .route(
            "/history/:symbol/:granularity/:currency/:limit",
            get(history),
        )
        .with_state(DataState { source, assets })
}

async fn latest(
    State(state): State<DataState>,
    Path((symbol, currency)): Path<(String, String)>,
) -> Result<Json<Value>, ServiceError> {
    let symbol = state.assets.require(&symbol)?;
    let currency: Currency = currency.parse()?;
    let price = state.source.latest_price(&symbol, &currency).await?;

    let mut body = Map::new();
    body.insert(
        symbol.to_string(),
        Value::String(format!("{price} {currency}")),
    );
    Ok(Json(Value::Object(body)))
}

async fn history(
    State(state): State<DataState>,
    Path((symbol, granularity, currency, limit)): Path<(String, String, String, String)>,
) -> Result<Json<Vec<PriceRecord>>, ServiceError> {
    let symbol = state.assets.require(&symbol)?;
    let granularity: Granularity = granularity.parse()?;
    let currency: Currency = currency.parse()?;
    let limit: u32 = limit
        .parse()
        .map_err(|_| ServiceError::BadRequest(format!("invalid history limit {limit:?}")))?;
    let query = HistoryQuery::new(symbol, granularity, currency, limit)?;

    let records = state.source.history(&query).await?;
    tracing::info!(
        symbol = %query.symbol,
        granularity = %query.granularity,
        records = records.len(),
        "Served history"
    );
    Ok(Json(records))
}
