use std::sync::Arc;

use crate::config::ScreenerConfig;
use crate::gateway::MarketDataGateway;

#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Read-only for the lifetime of the server; every request screens afresh.
pub struct AppStateInner {
    pub config: ScreenerConfig,
    pub gateway: Arc<dyn MarketDataGateway>,
}

impl AppState {
    pub fn new(config: ScreenerConfig, gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, gateway }),
        }
    }
}
