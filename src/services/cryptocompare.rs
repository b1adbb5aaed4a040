//! CryptoCompare price API client
//!
//! Only the two endpoints the data service needs: spot price
//! (`/data/price`) and candles (`/data/v2/histoday`, `/data/v2/histohour`).
//! Calls are attempted once.

use super::PriceSource;
use crate::backend::PriceRecord;
use crate::market::{Currency, Granularity, HistoryQuery, Symbol};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const BASE_URL: &str = "https://min-api.cryptocompare.com";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    #[error("price API request failed: {0}")]
    Request(String),
    #[error("price API timed out")]
    Timeout,
    #[error("price API error: {0}")]
    Api(String),
    #[error("invalid price API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for DataSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataSourceError::Timeout
        } else if err.is_decode() {
            DataSourceError::InvalidResponse(err.to_string())
        } else {
            DataSourceError::Request(err.to_string())
        }
    }
}

/// Envelope of the `v2/histo*` endpoints
#[derive(Debug, Deserialize)]
struct HistoResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Option<HistoData>,
}

#[derive(Debug, Deserialize)]
struct HistoData {
    #[serde(rename = "Data", default)]
    data: Vec<PriceRecord>,
}

pub struct CryptoCompareClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CryptoCompareClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at another host, e.g. a local stub
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint_path(granularity: Granularity) -> &'static str {
        match granularity {
            Granularity::Day => "/data/v2/histoday",
            Granularity::Hour => "/data/v2/histohour",
        }
    }

    /// GET with encoded query parameters. The key travels in the
    /// `Authorization` header so it never shows up in logged URLs.
    fn request(&self, path: &str, params: &[(&str, String)]) -> RequestBuilder {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(params);
        match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("Apikey {key}")),
            None => request,
        }
    }

    async fn get(&self, request: RequestBuilder) -> Result<Value, DataSourceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::Request(format!("HTTP {status}")));
        }
        let body: Value = response.json().await?;
        if body.get("Response").and_then(Value::as_str) == Some("Error") {
            let message = body
                .get("Message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(DataSourceError::Api(message.to_string()));
        }
        Ok(body)
    }
}

#[async_trait]
impl PriceSource for CryptoCompareClient {
    async fn latest_price(
        &self,
        symbol: &Symbol,
        currency: &Currency,
    ) -> Result<f64, DataSourceError> {
        let request = self.request(
            "/data/price",
            &[("fsym", symbol.to_string()), ("tsyms", currency.to_string())],
        );
        let body = self.get(request).await?;
        body.get(currency.as_str())
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                DataSourceError::InvalidResponse(format!("no {currency} price in {body}"))
            })
    }

    async fn history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, DataSourceError> {
        let request = self.request(
            Self::endpoint_path(query.granularity),
            &[
                ("fsym", query.symbol.to_string()),
                ("tsym", query.currency.to_string()),
                ("limit", query.limit.to_string()),
            ],
        );
        let body = self.get(request).await?;
        let parsed: HistoResponse = serde_json::from_value(body)
            .map_err(|e| DataSourceError::InvalidResponse(e.to_string()))?;
        if parsed.response != "Success" {
            return Err(DataSourceError::Api(parsed.message));
        }
        let records = parsed.data.map(|d| d.data).unwrap_or_default();
        tracing::debug!(symbol = %query.symbol, records = records.len(), "Fetched candles");
        Ok(records)
    }
}
