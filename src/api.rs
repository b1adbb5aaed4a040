//! HTTP surface of the gateway

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::{ChartResponse, ErrorResponse, HistoryResponse, ReportResponse};

use crate::backend::BackendClient;
use crate::gateway::Gateway;
use crate::market::AssetList;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway<Arc<dyn BackendClient>>>,
    pub assets: AssetList,
}

impl AppState {
    pub fn new(gateway: Gateway<Arc<dyn BackendClient>>, assets: AssetList) -> Self {
        Self {
            gateway: Arc::new(gateway),
            assets,
        }
    }
}
