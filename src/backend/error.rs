//! Backend error types

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Backing service a call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Data,
    Analytics,
    Plot,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Service::Data => "data service",
            Service::Analytics => "analytics service",
            Service::Plot => "plot service",
        })
    }
}

/// Failure talking to a backing service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("{0} timed out")]
    Timeout(Service),
    #[error("{service} unreachable: {message}")]
    Unreachable { service: Service, message: String },
    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: Service,
        status: u16,
        message: String,
    },
    #[error("{service} sent an invalid response: {message}")]
    InvalidResponse { service: Service, message: String },
    #[error("no price records returned for {symbol}")]
    EmptySeries { symbol: String },
}

impl UpstreamError {
    pub fn invalid_response(service: Service, message: impl Into<String>) -> Self {
        UpstreamError::InvalidResponse {
            service,
            message: message.into(),
        }
    }

    /// Classify a transport error from reqwest
    pub fn from_reqwest(service: Service, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(service)
        } else if err.is_decode() {
            UpstreamError::invalid_response(service, err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                service,
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            UpstreamError::Unreachable {
                service,
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("cannot compute statistics over an empty or non-finite series")]
    InvalidSeries,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cannot render a chart from an empty series")]
    EmptySeries,
    #[error("chart rendering failed: {0}")]
    Upstream(#[from] UpstreamError),
}
