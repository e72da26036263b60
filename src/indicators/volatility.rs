pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized volatility: sample standard deviation of daily percentage
/// changes, scaled by √252. `None` with fewer than three closes or when the
/// result is not finite.
pub fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    let returns: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let vol = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();

    vol.is_finite().then_some(vol)
}
