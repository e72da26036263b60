pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod volatility;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::PriceHistory;

pub use bollinger::{BollingerBand, band_percentages, bollinger_bands};
pub use volatility::annualized_volatility;

pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;
pub const LONG_SMA_PERIOD: usize = 200;

/// Latest indicator values for one ticker, all taken from the same history
/// and the same as-of date. `None` marks a value the history was too short
/// to produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub rsi: Option<f64>,
    pub bollinger_high: Option<f64>,
    pub bollinger_low: Option<f64>,
    pub moving_average_200: Option<f64>,
}

/// Compute the snapshot from the last point of each derived series.
/// Returns `None` for an empty history.
pub fn compute_snapshot(history: &PriceHistory) -> Option<IndicatorSnapshot> {
    let last = history.last()?;
    let closes = history.closes();

    let rsi = rsi::rsi(&closes, RSI_PERIOD).last().copied().flatten();
    let band = bollinger_bands(&closes, BOLLINGER_WINDOW, BOLLINGER_MULTIPLIER)
        .last()
        .copied()
        .flatten();
    let moving_average_200 = sma::sma(&closes, LONG_SMA_PERIOD).last().copied().flatten();

    Some(IndicatorSnapshot {
        as_of: last.date,
        current_price: last.close,
        rsi,
        bollinger_high: band.map(|b| b.high),
        bollinger_low: band.map(|b| b.low),
        moving_average_200,
    })
}
