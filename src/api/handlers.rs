//! HTTP request handlers for the gateway surface

use super::types::{ChartResponse, ErrorResponse, HealthResponse, HistoryResponse, ReportResponse};
use super::AppState;
use crate::backend::{PricePoint, StatsResult};
use crate::gateway::GatewayError;
use crate::market::{Currency, Granularity, HistoryQuery, MarketError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/latest/:symbol/:currency", get(latest))
        .route(
            "/history/:symbol/:granularity/:currency/:limit",
            get(history),
        )
        .route(
            "/analytics/:symbol/:granularity/:currency/:limit",
            get(analytics),
        )
        .route("/plot/:symbol/:granularity/:currency/:limit", get(plot))
        .route("/report/:symbol/:granularity/:currency/:limit", get(report))
        .route("/health", get(health))
        .with_state(state)
}

type WindowParams = Path<(String, String, String, String)>;

impl AppState {
    fn history_query(
        &self,
        (symbol, granularity, currency, limit): (String, String, String, String),
    ) -> Result<HistoryQuery, AppError> {
        let symbol = self.assets.require(&symbol)?;
        let granularity: Granularity = granularity.parse()?;
        let currency: Currency = currency.parse()?;
        let limit: u32 = limit
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid history limit {limit:?}")))?;
        Ok(HistoryQuery::new(symbol, granularity, currency, limit)?)
    }
}

// ============================================================
// Market data
// ============================================================

async fn latest(
    State(state): State<AppState>,
    Path((symbol, currency)): Path<(String, String)>,
) -> Result<Json<PricePoint>, AppError> {
    let symbol = state.assets.require(&symbol)?;
    let currency: Currency = currency.parse()?;
    let point = state.gateway.latest(&symbol, &currency).await?;
    Ok(Json(point))
}

async fn history(
    State(state): State<AppState>,
    Path(params): WindowParams,
) -> Result<Json<HistoryResponse>, AppError> {
    let query = state.history_query(params)?;
    let series = state.gateway.history(&query).await?;
    Ok(Json(series.into()))
}

// ============================================================
// Derived results
// ============================================================

async fn analytics(
    State(state): State<AppState>,
    Path(params): WindowParams,
) -> Result<Json<StatsResult>, AppError> {
    let query = state.history_query(params)?;
    Ok(Json(state.gateway.stats(&query).await?))
}

async fn plot(
    State(state): State<AppState>,
    Path(params): WindowParams,
) -> Result<Json<ChartResponse>, AppError> {
    let query = state.history_query(params)?;
    let chart = state.gateway.plot(&query).await?;
    tracing::info!(symbol = %query.symbol, key = %chart.key, "Chart rendered");
    Ok(Json(chart.into()))
}

async fn report(
    State(state): State<AppState>,
    Path(params): WindowParams,
) -> Result<Json<ReportResponse>, AppError> {
    let query = state.history_query(params)?;
    Ok(Json(state.gateway.report(&query).await?.into()))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    Upstream(String),
    Timeout(String),
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        tracing::warn!(kind = err.tag(), error = %err, "Gateway request failed");
        match err {
            GatewayError::Timeout(_) => AppError::Timeout(err.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
