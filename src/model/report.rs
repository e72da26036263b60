use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::evaluation::Evaluation;

/// One row of the screening table.
///
/// Field names follow the dashboard column headers so CSV and JSON exports
/// match what the table shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerResult {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Company")]
    pub company: Option<String>,
    #[serde(rename = "Current Price")]
    pub current_price: f64,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "Bollinger High")]
    pub bollinger_high: Option<f64>,
    #[serde(rename = "Bollinger High %")]
    pub bollinger_high_pct: Option<f64>,
    #[serde(rename = "Bollinger Low")]
    pub bollinger_low: Option<f64>,
    #[serde(rename = "Bollinger Low %")]
    pub bollinger_low_pct: Option<f64>,
    #[serde(rename = "200-day MA")]
    pub moving_average_200: Option<f64>,
    #[serde(rename = "Evaluation")]
    pub evaluation: Evaluation,
    #[serde(rename = "Put Strike Price")]
    pub put_strike: f64,
    #[serde(rename = "Call Strike Price")]
    pub call_strike: f64,
    #[serde(rename = "Expiration Date")]
    pub expiration: NaiveDate,
    #[serde(rename = "Put Premium")]
    pub put_premium: f64,
    #[serde(rename = "Call Premium")]
    pub call_premium: f64,
    #[serde(rename = "Put Delta")]
    pub put_delta: f64,
    #[serde(rename = "Call Delta")]
    pub call_delta: f64,
}

/// A ticker the pipeline could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTicker {
    pub ticker: String,
    pub error: String,
}

/// Per-ticker result of a screening pass.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Evaluated(TickerResult),
    Failed(FailedTicker),
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Evaluated(r) => &r.ticker,
            TickerOutcome::Failed(f) => &f.ticker,
        }
    }
}

/// Rows and failures of one screening pass, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub rows: Vec<TickerResult>,
    pub failures: Vec<FailedTicker>,
}

impl ScreenReport {
    pub fn from_outcomes(outcomes: Vec<TickerOutcome>) -> Self {
        let mut report = ScreenReport::default();
        for outcome in outcomes {
            match outcome {
                TickerOutcome::Evaluated(row) => report.rows.push(row),
                TickerOutcome::Failed(failure) => report.failures.push(failure),
            }
        }
        report
    }
}
