//! Gateway outcome errors

use crate::backend::{RenderError, Service, StatsError, UpstreamError};
use thiserror::Error;

/// A failed gateway request. Exactly one tag per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("market data unavailable: {0}")]
    DataUnavailable(UpstreamError),
    #[error("{0} timed out")]
    Timeout(Service),
    #[error("statistics unavailable: {0}")]
    StatsFailed(StatsError),
    #[error("{0}")]
    RenderFailed(RenderError),
}

impl GatewayError {
    pub(crate) fn from_fetch(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(service) => GatewayError::Timeout(service),
            other => GatewayError::DataUnavailable(other),
        }
    }

    pub(crate) fn from_stats(err: StatsError) -> Self {
        match err {
            StatsError::Upstream(UpstreamError::Timeout(service)) => GatewayError::Timeout(service),
            other => GatewayError::StatsFailed(other),
        }
    }

    pub(crate) fn from_render(err: RenderError) -> Self {
        match err {
            RenderError::Upstream(UpstreamError::Timeout(service)) => {
                GatewayError::Timeout(service)
            }
            other => GatewayError::RenderFailed(other),
        }
    }

    /// Short machine-readable tag
    pub fn tag(&self) -> &'static str {
        match self {
            GatewayError::DataUnavailable(_) => "data_unavailable",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::StatsFailed(_) => "stats_failed",
            GatewayError::RenderFailed(_) => "render_failed",
        }
    }
}
