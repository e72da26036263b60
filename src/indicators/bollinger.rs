/// One point of a Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub middle: f64,
    pub high: f64,
    pub low: f64,
}

/// Bollinger Bands: SMA(`window`) ± `multiplier` · σ, with σ the population
/// standard deviation of the same window.
pub fn bollinger_bands(closes: &[f64], window: usize, multiplier: f64) -> Vec<Option<BollingerBand>> {
    if window == 0 || closes.len() < window {
        return vec![None; closes.len()];
    }

    let mut results = vec![None; window - 1];
    for slice in closes.windows(window) {
        let n = window as f64;
        let mean = slice.iter().sum::<f64>() / n;
        let variance = slice.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        results.push(Some(BollingerBand {
            middle: mean,
            high: mean + multiplier * std_dev,
            low: mean - multiplier * std_dev,
        }));
    }
    results
}

/// Signed distance of each band from the current price, in percent.
///
/// Returns `(high_pct, low_pct)` where
/// `high_pct = -((high - price) / price) * 100` and
/// `low_pct = ((low - price) / price) * 100`. A band above the price
/// therefore yields a negative `high_pct`. A zero price is not guarded.
pub fn band_percentages(current_price: f64, bollinger_high: f64, bollinger_low: f64) -> (f64, f64) {
    let high_pct = -((bollinger_high - current_price) / current_price) * 100.0;
    let low_pct = ((bollinger_low - current_price) / current_price) * 100.0;
    (high_pct, low_pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_on_constant_series() {
        let closes = vec![50.0; 25];
        let bands = bollinger_bands(&closes, 20, 2.0);
        assert_eq!(bands.len(), 25);
        assert!(bands[..19].iter().all(Option::is_none));
        let last = bands[24].unwrap();
        assert_eq!(last.middle, 50.0);
        assert_eq!(last.high, 50.0);
        assert_eq!(last.low, 50.0);
    }

    #[test]
    fn test_bands_use_population_std_dev() {
        // Window [1, 3]: mean 2, population σ 1.
        let bands = bollinger_bands(&[1.0, 3.0], 2, 2.0);
        let band = bands[1].unwrap();
        assert!((band.high - 4.0).abs() < 1e-12);
        assert!((band.low - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_percentages_sign_convention() {
        let (high_pct, low_pct) = band_percentages(100.0, 110.0, 90.0);
        assert!((high_pct - -10.0).abs() < 1e-12);
        assert!((low_pct - -10.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_percentages_price_outside_bands() {
        let (high_pct, low_pct) = band_percentages(100.0, 95.0, 105.0);
        assert!((high_pct - 5.0).abs() < 1e-12);
        assert!((low_pct - 5.0).abs() < 1e-12);
    }
}
