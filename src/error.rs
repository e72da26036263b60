use thiserror::Error;

use crate::pricing::PricingError;

/// Failures talking to the market data provider.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected request for `{symbol}`: {reason}")]
    Provider { symbol: String, reason: String },

    #[error("provider returned no data for `{symbol}`")]
    NoData { symbol: String },

    #[error("malformed response for `{symbol}`: {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("could not open a provider session: {reason}")]
    Session { reason: String },
}

impl GatewayError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            _ => false,
        }
    }
}

/// Why a single ticker could not be screened.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("price history for `{symbol}` is empty")]
    EmptyHistory { symbol: String },

    #[error("`{symbol}`: {source}")]
    Pricing {
        symbol: String,
        #[source]
        source: PricingError,
    },
}

/// Problems loading or applying the screener configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("{requested} tickers requested, at most {max} allowed")]
    TooManyTickers { requested: usize, max: usize },
}
