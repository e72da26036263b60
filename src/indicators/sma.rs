/// Simple moving average. Entries before the first full window are `None`.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];

    let mut sum: f64 = values.iter().take(period).sum();
    results.push(Some(sum / period as f64));

    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        results.push(Some(sum / period as f64));
    }
    results
}
