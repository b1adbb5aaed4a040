//! Plot service: renders a posted series and stores the chart
//!
//! `POST /plot/:symbol/:granularity/:issued_at` writes the PNG under
//! `key_for(symbol, granularity, issued_at)`, the same key the gateway hands
//! to the conversation. `issued_at` is accepted as RFC 3339 or in the legacy
//! `%Y-%m-%d %H:%M:%S%.f` form.

use super::chart;
use super::ServiceError;
use crate::artifact::{key_for, parse_issued_at, ArtifactStore};
use crate::backend::PriceRecord;
use crate::market::{AssetList, Granularity};
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
struct PlotState {
    store: Arc<dyn ArtifactStore>,
    assets: AssetList,
}

pub fn plot_router(store: Arc<dyn ArtifactStore>, assets: AssetList) -> Router {
    Router::new()
        .route("/plot/:symbol/:granularity/:issued_at", post(plot))
        .with_state(PlotState { store, assets })
}

async fn plot(
    State(state): State<PlotState>,
    Path((symbol, granularity, issued_at)): Path<(String, String, String)>,
    Json(records): Json<Vec<PriceRecord>>,
) -> Result<Json<Value>, ServiceError> {
    let symbol = state.assets.require(&symbol)?;
    let granularity: Granularity = granularity.parse()?;
    let issued_at = parse_issued_at(&issued_at)
        .ok_or_else(|| ServiceError::BadRequest(format!("invalid timestamp {issued_at:?}")))?;

    let png = chart::render_png(&records)?;
    let key = key_for(&symbol, granularity, issued_at);
    state.store.put(&key, png).await?;

    tracing::info!(key = %key, records = records.len(), "Stored chart");
    Ok(Json(json!({ "status": "success", "key": key.as_str() })))
}
