use statrs::function::erf::erfc;

use crate::model::{OptionQuote, OptionSide, PricedOption};

/// Annualized risk-free rate used for every delta.
pub const RISK_FREE_RATE: f64 = 0.01;

/// Time to expiration in years. Fixed at two weeks regardless of the
/// expiration date actually selected.
pub const TIME_TO_EXPIRY_YEARS: f64 = 14.0 / 365.0;

/// Standard normal CDF: Φ(x) = erfc(-x / √2) / 2
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Black-Scholes inputs shared by every strike of one chain (no dividends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    pub spot: f64,
    pub volatility: f64,
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
}

impl BlackScholes {
    /// Model with the fixed two-week horizon and 1% rate.
    pub fn new(spot: f64, volatility: f64) -> Self {
        Self {
            spot,
            volatility,
            time_to_expiry: TIME_TO_EXPIRY_YEARS,
            risk_free_rate: RISK_FREE_RATE,
        }
    }

    /// d1 = (ln(S/K) + (r + σ²/2)·T) / (σ·√T)
    pub fn d1(&self, strike: f64) -> f64 {
        let sigma = self.volatility;
        let t = self.time_to_expiry;
        ((self.spot / strike).ln() + (self.risk_free_rate + 0.5 * sigma * sigma) * t)
            / (sigma * t.sqrt())
    }

    /// Call delta Φ(d1); put delta Φ(d1) − 1.
    pub fn delta(&self, side: OptionSide, strike: f64) -> f64 {
        let n = norm_cdf(self.d1(strike));
        match side {
            OptionSide::Call => n,
            OptionSide::Put => n - 1.0,
        }
    }

    /// Attach a delta to every row of one side of a chain.
    pub fn price(&self, side: OptionSide, quotes: &[OptionQuote]) -> Vec<PricedOption> {
        quotes
            .iter()
            .map(|q| PricedOption {
                strike: q.strike,
                last_price: q.last_price,
                delta: self.delta(side, q.strike),
            })
            .collect()
    }
}
