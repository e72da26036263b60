use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily close for one trading session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Lookback requested from the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryPeriod {
    OneDay,
    OneYear,
}

impl HistoryPeriod {
    /// Range token understood by the chart endpoint.
    pub fn as_range(&self) -> &'static str {
        match self {
            HistoryPeriod::OneDay => "1d",
            HistoryPeriod::OneYear => "1y",
        }
    }
}

/// Ordered daily closes for one ticker. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Build a history, ordering points by date.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Descriptive data about a listed company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_history_sorts_points() {
        let history = PriceHistory::new(vec![
            PricePoint { date: day(3), close: 3.0 },
            PricePoint { date: day(1), close: 1.0 },
            PricePoint { date: day(2), close: 2.0 },
        ]);
        assert_eq!(history.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(history.last().map(|p| p.date), Some(day(3)));
    }
}
