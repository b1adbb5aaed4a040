//! HTTP implementation of the backend client

use super::{
    BackendClient, PricePoint, PriceRecord, PriceSeries, RenderError, Service, StatsError,
    StatsResult, UpstreamError,
};
use crate::artifact::{format_issued_at, key_for, ArtifactKey};
use crate::market::{Currency, HistoryQuery, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Base URLs of the three backing services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoints {
    pub data: String,
    pub analytics: String,
    pub plot: String,
}

impl BackendEndpoints {
    fn url(&self, service: Service, path: &str) -> String {
        let base = match service {
            Service::Data => &self.data,
            Service::Analytics => &self.analytics,
            Service::Plot => &self.plot,
        };
        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

/// `{ "error": "..." }` bodies sent by the services on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Backend client talking JSON over HTTP
pub struct HttpBackend {
    client: Client,
    endpoints: BackendEndpoints,
}

impl HttpBackend {
    pub fn new(endpoints: BackendEndpoints, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, endpoints }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
    ) -> Result<T, UpstreamError> {
        let url = self.endpoints.url(service, path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(service, &e))?;
        read_json(service, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &[PriceRecord],
    ) -> Result<T, UpstreamError> {
        let url = self.endpoints.url(service, path);
        tracing::debug!(%url, records = body.len(), "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(service, &e))?;
        read_json(service, response).await
    }
}

async fn read_json<T: DeserializeOwned>(
    service: Service,
    response: Response,
) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(service, &e))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::invalid_response(service, e.to_string()))
}

/// The data service answers `/latest` with `{ "BTC": "64250.5 USD" }`.
/// A bare number is accepted too.
fn parse_latest(body: &Value, symbol: &Symbol) -> Option<f64> {
    let value = body
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(symbol.as_str()))
        .map(|(_, v)| v)?;
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.split_whitespace().next()?.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn fetch_latest(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<PricePoint, UpstreamError> {
        let body: Value = self
            .get_json(Service::Data, &format!("/latest/{symbol}/{currency}"))
            .await?;
        let price = parse_latest(&body, symbol).ok_or_else(|| {
            UpstreamError::invalid_response(
                Service::Data,
                format!("no price for {symbol} in {body}"),
            )
        })?;
        Ok(PricePoint {
            symbol: symbol.clone(),
            currency: currency.clone(),
            price,
        })
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> Result<PriceSeries, UpstreamError> {
        let path = format!(
            "/history/{}/{}/{}/{}",
            query.symbol, query.granularity, query.currency, query.limit
        );
        let records: Vec<PriceRecord> = self.get_json(Service::Data, &path).await?;
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
        if series.is_empty() {
            return Err(StatsError::InvalidSeries);
        }
        let result: StatsResult = self
            .post_json(Service::Analytics, "/analytics", &series.records)
            .await?;
        Ok(result)
    }

    async fn render_plot(
        &self,
        series: &PriceSeries,
        issued_at: DateTime<Utc>,
    ) -> Result<ArtifactKey, RenderError> {
        if series.is_empty() {
            return Err(RenderError::EmptySeries);
        }
        let path = format!(
            "/plot/{}/{}/{}",
            series.symbol,
            series.granularity,
            format_issued_at(issued_at)
        );
        let _ack: Value = self.post_json(Service::Plot, &path, &series.records).await?;
        Ok(key_for(&series.symbol, series.granularity, issued_at))
    }
}
