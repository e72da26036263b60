use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side of an option chain a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Put,
    Call,
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Put => write!(f, "put"),
            OptionSide::Call => write!(f, "call"),
        }
    }
}

/// One contract row as the provider returns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub last_price: f64,
}

/// Puts and calls for a single expiration date.
///
/// Rows are kept in provider order; selection code sorts by strike itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub expiration: NaiveDate,
    pub puts: Vec<OptionQuote>,
    pub calls: Vec<OptionQuote>,
}

impl OptionChain {
    pub fn side(&self, side: OptionSide) -> &[OptionQuote] {
        match side {
            OptionSide::Put => &self.puts,
            OptionSide::Call => &self.calls,
        }
    }
}

/// An option row augmented with its Black-Scholes delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricedOption {
    pub strike: f64,
    pub last_price: f64,
    pub delta: f64,
}
