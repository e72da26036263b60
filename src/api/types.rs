use serde::{Deserialize, Serialize};

use crate::model::{FailedTicker, TickerResult};

// ── Request types ────────────────────────────────────────────────────

/// `?tickers=AAPL,MSFT`; absent means the default selection, present but
/// empty means no selection.
#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    #[serde(default)]
    pub tickers: Option<String>,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct TickersResponse {
    pub universe: Vec<String>,
    pub default: Vec<String>,
    pub max_tickers: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub selection: Vec<String>,
    pub rows: Vec<TickerResult>,
    pub failures: Vec<FailedTicker>,
}
