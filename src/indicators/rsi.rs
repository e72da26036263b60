/// Wilder relative strength index over a close series.
///
/// Gains and losses are close-to-close changes, with the missing change at
/// index 0 counted as zero. Both are exponential averages with
/// `alpha = 1 / period` seeded at zero on the first close, so the first value
/// appears at index `period - 1`. When the average loss is zero the RSI is 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let alpha = 1.0 / period as f64;
    let mut results = Vec::with_capacity(closes.len());

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
        avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;

        if i + 1 < period {
            results.push(None);
        } else if avg_loss == 0.0 {
            results.push(Some(100.0));
        } else {
            let rs = avg_gain / avg_loss;
            results.push(Some(100.0 - (100.0 / (1.0 + rs))));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_insufficient_data() {
        let closes = vec![1.0; 13];
        assert_eq!(rsi(&closes, 14), vec![None; 13]);
    }

    #[test]
    fn test_rsi_first_value_at_period_minus_one() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + (i % 3) as f64).collect();
        let results = rsi(&closes, 14);
        assert_eq!(results.len(), 14);
        assert!(results[..13].iter().all(Option::is_none));
        let value = results[13].unwrap();
        assert!((0.0..=100.0).contains(&value), "RSI out of range: {value}");
    }

    #[test]
    fn test_rsi_zero_seed() {
        // Changes +1, +1, -2 with alpha 1/2 starting from zero averages:
        // gain 0.5, 0.75, 0.375; loss 0, 0, 1.0.
        let results = rsi(&[10.0, 11.0, 12.0, 10.0], 2);
        assert_eq!(results[0], None);
        assert_eq!(results[1], Some(100.0));
        assert_eq!(results[2], Some(100.0));
        let expected = 100.0 - 100.0 / (1.0 + 0.375);
        assert!((results[3].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_flat_history_of_one_period_is_100() {
        assert_eq!(rsi(&[5.0; 14], 14)[13], Some(100.0));
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let results = rsi(&closes, 14);
        for value in &results[13..] {
            assert_eq!(*value, Some(100.0));
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let results = rsi(&closes, 14);
        for value in &results[13..] {
            assert_eq!(*value, Some(0.0));
        }
    }

    #[test]
    fn test_rsi_known_sequence() {
        // Alternating +1 / -1 moves keep gains and losses balanced near 50.
        let closes: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let last = rsi(&closes, 14).last().copied().flatten().unwrap();
        assert!((last - 50.0).abs() < 5.0, "expected ~50, got {last}");
    }
}
