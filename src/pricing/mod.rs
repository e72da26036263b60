pub mod black_scholes;
pub mod expiration;
pub mod strike;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::error::ScreenError;
use crate::gateway::MarketDataGateway;
use crate::indicators::annualized_volatility;
use crate::model::{HistoryPeriod, OptionChain, OptionSide};

pub use black_scholes::{BlackScholes, RISK_FREE_RATE, TIME_TO_EXPIRY_YEARS, norm_cdf};
pub use expiration::{select_expiration, target_expiration};
pub use strike::{CALL_DELTA_BAND, PUT_DELTA_BAND, StrikePick, select_call, select_put};

/// Reasons a strike recommendation cannot be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("no option expirations listed")]
    NoExpirations,

    #[error("no option expiration on or after {target}")]
    NoExpirationAfter { target: NaiveDate },

    #[error("annualized volatility unavailable")]
    VolatilityUnavailable,

    #[error("no {side} strike on the required side of {current_price:.2}")]
    NoQualifyingStrike { side: OptionSide, current_price: f64 },
}

/// Strikes to sell on both sides of the chain for one expiration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikeRecommendation {
    pub expiration: NaiveDate,
    pub current_price: f64,
    pub volatility: f64,
    pub put: StrikePick,
    pub call: StrikePick,
}

/// Price every row of `chain` and pick the put and call to sell.
pub fn select_strikes(
    chain: &OptionChain,
    current_price: f64,
    volatility: f64,
) -> Result<StrikeRecommendation, PricingError> {
    if !(volatility.is_finite() && volatility > 0.0) {
        return Err(PricingError::VolatilityUnavailable);
    }

    let model = BlackScholes::new(current_price, volatility);
    let puts = model.price(OptionSide::Put, chain.side(OptionSide::Put));
    let calls = model.price(OptionSide::Call, chain.side(OptionSide::Call));

    Ok(StrikeRecommendation {
        expiration: chain.expiration,
        current_price,
        volatility,
        put: select_put(&puts, current_price)?,
        call: select_call(&calls, current_price)?,
    })
}

/// Fetch what the strike selection needs for `symbol` and run it.
///
/// The current price comes from a one-day history, volatility from a
/// one-year history. Nothing is cached between calls.
pub async fn recommend_strikes(
    gateway: &dyn MarketDataGateway,
    symbol: &str,
    today: NaiveDate,
) -> Result<StrikeRecommendation, ScreenError> {
    let pricing_err = |source: PricingError| ScreenError::Pricing {
        symbol: symbol.to_string(),
        source,
    };

    let recent = gateway.price_history(symbol, HistoryPeriod::OneDay).await?;
    let current_price = recent
        .last()
        .map(|p| p.close)
        .ok_or_else(|| ScreenError::EmptyHistory {
            symbol: symbol.to_string(),
        })?;

    let year = gateway.price_history(symbol, HistoryPeriod::OneYear).await?;
    let volatility = annualized_volatility(&year.closes())
        .ok_or_else(|| pricing_err(PricingError::VolatilityUnavailable))?;

    let expirations = gateway.expirations(symbol).await?;
    let expiration = select_expiration(today, &expirations).map_err(pricing_err)?;
    debug!(symbol, %expiration, volatility, current_price, "selected expiration");

    let chain = gateway.option_chain(symbol, expiration).await?;
    select_strikes(&chain, current_price, volatility).map_err(pricing_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionQuote;

    fn chain(puts: &[f64], calls: &[f64]) -> OptionChain {
        let quote = |strike: &f64| OptionQuote {
            strike: *strike,
            last_price: 1.0,
        };
        OptionChain {
            expiration: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            puts: puts.iter().map(quote).collect(),
            calls: calls.iter().map(quote).collect(),
        }
    }

    #[test]
    fn test_rejects_non_positive_volatility() {
        let c = chain(&[95.0], &[105.0]);
        assert_eq!(select_strikes(&c, 100.0, 0.0), Err(PricingError::VolatilityUnavailable));
        assert_eq!(select_strikes(&c, 100.0, f64::NAN), Err(PricingError::VolatilityUnavailable));
    }

    #[test]
    fn test_recommendation_carries_expiration() {
        let c = chain(&[90.0, 95.0], &[105.0, 110.0]);
        let rec = select_strikes(&c, 100.0, 0.3).unwrap();
        assert_eq!(rec.expiration, c.expiration);
        assert!(rec.put.strike < 100.0);
        assert!(rec.call.strike > 100.0);
    }
}
