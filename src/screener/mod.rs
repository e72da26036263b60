use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ScreenerConfig;
use crate::error::ScreenError;
use crate::evaluation::evaluate;
use crate::gateway::{self, MarketDataGateway};
use crate::indicators::{band_percentages, compute_snapshot};
use crate::model::{FailedTicker, HistoryPeriod, ScreenReport, TickerOutcome, TickerResult};
use crate::pricing::recommend_strikes;
use crate::report;

/// How the tickers of one pass are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    /// One ticker after another.
    #[default]
    Sequential,
    /// One task per ticker, joined before the table is assembled.
    Parallel,
}

/// Run the full pipeline for one ticker.
///
/// Company info is best effort: a failure there leaves the name empty and
/// does not fail the ticker.
pub async fn screen_ticker(
    gateway: &dyn MarketDataGateway,
    symbol: &str,
    today: NaiveDate,
) -> Result<TickerResult, ScreenError> {
    let company = match gateway.company_info(symbol).await {
        Ok(info) => info.name,
        Err(e) => {
            warn!(symbol, error = %e, "company info unavailable");
            None
        }
    };

    let history = gateway.price_history(symbol, HistoryPeriod::OneYear).await?;
    let snapshot = compute_snapshot(&history).ok_or_else(|| ScreenError::EmptyHistory {
        symbol: symbol.to_string(),
    })?;
    let evaluation = evaluate(&snapshot);

    let rec = recommend_strikes(gateway, symbol, today).await?;

    let (high_pct, low_pct) = match (snapshot.bollinger_high, snapshot.bollinger_low) {
        (Some(high), Some(low)) => {
            let (h, l) = band_percentages(rec.current_price, high, low);
            (Some(h), Some(l))
        }
        _ => (None, None),
    };

    Ok(TickerResult {
        ticker: symbol.to_string(),
        company,
        current_price: rec.current_price,
        rsi: snapshot.rsi,
        bollinger_high: snapshot.bollinger_high,
        bollinger_high_pct: high_pct,
        bollinger_low: snapshot.bollinger_low,
        bollinger_low_pct: low_pct,
        moving_average_200: snapshot.moving_average_200,
        evaluation,
        put_strike: rec.put.strike,
        call_strike: rec.call.strike,
        expiration: rec.expiration,
        put_premium: rec.put.premium,
        call_premium: rec.call.premium,
        put_delta: rec.put.delta,
        call_delta: rec.call.delta,
    })
}

async fn screen_one(gateway: &dyn MarketDataGateway, symbol: &str, today: NaiveDate) -> TickerOutcome {
    match screen_ticker(gateway, symbol, today).await {
        Ok(row) => {
            info!(symbol, evaluation = %row.evaluation, "screened");
            TickerOutcome::Evaluated(row)
        }
        Err(e) => {
            warn!(symbol, error = %e, "screening failed");
            TickerOutcome::Failed(FailedTicker {
                ticker: symbol.to_string(),
                error: e.to_string(),
            })
        }
    }
}

/// Screen every ticker. Never fails as a whole: each ticker yields either a
/// row or a failure, in the order of `tickers`.
pub async fn screen_all(
    gateway: Arc<dyn MarketDataGateway>,
    tickers: &[String],
    mode: ScreenMode,
    today: NaiveDate,
    progress: Option<&ProgressBar>,
) -> Vec<TickerOutcome> {
    match mode {
        ScreenMode::Sequential => {
            let mut outcomes = Vec::with_capacity(tickers.len());
            for symbol in tickers {
                outcomes.push(screen_one(gateway.as_ref(), symbol, today).await);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
            }
            outcomes
        }
        ScreenMode::Parallel => {
            let handles: Vec<_> = tickers
                .iter()
                .map(|symbol| {
                    let gateway = Arc::clone(&gateway);
                    let symbol = symbol.clone();
                    let pb = progress.cloned();
                    tokio::spawn(async move {
                        let outcome = screen_one(gateway.as_ref(), &symbol, today).await;
                        if let Some(pb) = pb {
                            pb.inc(1);
                        }
                        outcome
                    })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(handles.len());
            for (symbol, handle) in tickers.iter().zip(handles) {
                let outcome = handle.await.unwrap_or_else(|e| {
                    TickerOutcome::Failed(FailedTicker {
                        ticker: symbol.clone(),
                        error: format!("screening task aborted: {e}"),
                    })
                });
                outcomes.push(outcome);
            }
            outcomes
        }
    }
}

/// Today's date in local time, the anchor for expiration selection.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ── CLI entry points ─────────────────────────────────────────────────

/// Run the screen command: screen the selection, print the table, and
/// optionally export it.
pub fn run(
    config: &ScreenerConfig,
    tickers: &[String],
    parallel: bool,
    output: Option<&Path>,
) -> Result<()> {
    let selection = config.resolve_selection(tickers)?;
    let mode = if parallel { ScreenMode::Parallel } else { config.screen.mode };
    let gateway = gateway::from_config(&config.gateway).context("creating market data gateway")?;

    println!("Screening {} tickers ({:?})", selection.len(), mode);

    let pb = ProgressBar::new(selection.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Screening [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let outcomes = rt.block_on(screen_all(gateway, &selection, mode, today(), Some(&pb)));
    pb.finish_and_clear();

    let report = ScreenReport::from_outcomes(outcomes);
    report::print_table(&report);

    if let Some(path) = output {
        report::export(&report, path)?;
        println!("\nWrote {} rows to {}", report.rows.len(), path.display());
    }

    Ok(())
}

/// Run the strike command for a single ticker.
pub fn run_strike(config: &ScreenerConfig, symbol: &str) -> Result<()> {
    let symbol = symbol.trim().to_uppercase();
    let gateway = gateway::from_config(&config.gateway).context("creating market data gateway")?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let rec = rt
        .block_on(recommend_strikes(gateway.as_ref(), &symbol, today()))
        .with_context(|| format!("recommending strikes for {symbol}"))?;

    print!("{}", report::render_recommendation(&symbol, &rec));
    Ok(())
}
