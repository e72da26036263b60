use std::ops::RangeInclusive;

use serde::Serialize;

use crate::model::{OptionSide, PricedOption};

use super::PricingError;

/// Delta band preferred when selling puts.
pub const PUT_DELTA_BAND: RangeInclusive<f64> = -0.40..=-0.30;

/// Delta band preferred when selling calls.
pub const CALL_DELTA_BAND: RangeInclusive<f64> = 0.30..=0.40;

/// The strike chosen for one side of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikePick {
    pub strike: f64,
    pub premium: f64,
    pub delta: f64,
    /// `true` when the delta band matched, `false` when the nearest strike
    /// was taken as a fallback.
    pub qualified: bool,
}

impl StrikePick {
    fn from_row(row: &PricedOption, qualified: bool) -> Self {
        Self {
            strike: row.strike,
            premium: row.last_price,
            delta: row.delta,
            qualified,
        }
    }
}

/// Select the put to sell.
///
/// Only strikes below `current_price` count. Among those with a delta in
/// [`PUT_DELTA_BAND`] the largest strike wins; with none in band, the largest
/// strike below the price is taken.
pub fn select_put(rows: &[PricedOption], current_price: f64) -> Result<StrikePick, PricingError> {
    let candidates = sorted_by_strike(rows.iter().filter(|r| r.strike < current_price));

    if let Some(row) = candidates.iter().rev().find(|r| PUT_DELTA_BAND.contains(&r.delta)) {
        return Ok(StrikePick::from_row(row, true));
    }

    candidates
        .last()
        .map(|row| StrikePick::from_row(row, false))
        .ok_or(PricingError::NoQualifyingStrike {
            side: OptionSide::Put,
            current_price,
        })
}

/// Select the call to sell.
///
/// Only strikes above `current_price` count. Among those with a delta in
/// [`CALL_DELTA_BAND`] the smallest strike wins; with none in band, the
/// smallest strike above the price is taken.
pub fn select_call(rows: &[PricedOption], current_price: f64) -> Result<StrikePick, PricingError> {
    let candidates = sorted_by_strike(rows.iter().filter(|r| r.strike > current_price));

    if let Some(row) = candidates.iter().find(|r| CALL_DELTA_BAND.contains(&r.delta)) {
        return Ok(StrikePick::from_row(row, true));
    }

    candidates
        .first()
        .map(|row| StrikePick::from_row(row, false))
        .ok_or(PricingError::NoQualifyingStrike {
            side: OptionSide::Call,
            current_price,
        })
}

fn sorted_by_strike<'a>(rows: impl Iterator<Item = &'a PricedOption>) -> Vec<&'a PricedOption> {
    let mut rows: Vec<&PricedOption> = rows.collect();
    rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    rows
}
