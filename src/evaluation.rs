use std::fmt;

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;

pub const OVERSOLD_RSI: f64 = 30.0;
pub const OVERBOUGHT_RSI: f64 = 70.0;

/// Classification of a ticker for premium selling.
///
/// Serialized as the display label so exports and the dashboard keep the
/// exact wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Evaluation {
    #[serde(rename = "Good for selling puts")]
    GoodForSellingPuts,
    #[serde(rename = "Good for selling calls")]
    GoodForSellingCalls,
    #[serde(rename = "Not a good time for selling puts or calls")]
    Neutral,
}

impl Evaluation {
    pub fn label(&self) -> &'static str {
        match self {
            Evaluation::GoodForSellingPuts => "Good for selling puts",
            Evaluation::GoodForSellingCalls => "Good for selling calls",
            Evaluation::Neutral => "Not a good time for selling puts or calls",
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Apply the decision table; the first matching rule wins.
///
/// 1. RSI < 30, price below the lower band, price above the 200-day MA → puts.
/// 2. RSI > 70, price above the upper band, price below the 200-day MA → calls.
/// 3. Otherwise neutral.
///
/// Comparisons against a missing indicator never match.
pub fn evaluate(snapshot: &IndicatorSnapshot) -> Evaluation {
    let price = Some(snapshot.current_price);

    if less(snapshot.rsi, Some(OVERSOLD_RSI))
        && less(price, snapshot.bollinger_low)
        && less(snapshot.moving_average_200, price)
    {
        Evaluation::GoodForSellingPuts
    } else if less(Some(OVERBOUGHT_RSI), snapshot.rsi)
        && less(snapshot.bollinger_high, price)
        && less(price, snapshot.moving_average_200)
    {
        Evaluation::GoodForSellingCalls
    } else {
        Evaluation::Neutral
    }
}

fn less(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}
