pub mod yahoo;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::model::{CompanyInfo, HistoryPeriod, OptionChain, PriceHistory};

pub use yahoo::YahooGateway;

/// Source of quotes, histories, and option chains.
///
/// Every method is a fresh request; implementations do not cache.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Descriptive data for the ticker (long name, currency, exchange).
    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, GatewayError>;

    /// Daily closes covering `period`, oldest first.
    async fn price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceHistory, GatewayError>;

    /// Listed option expiration dates.
    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, GatewayError>;

    /// Puts and calls for one expiration.
    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, GatewayError>;
}

/// Build the default HTTP gateway from configuration.
pub fn from_config(config: &GatewayConfig) -> Result<Arc<dyn MarketDataGateway>, GatewayError> {
    Ok(Arc::new(YahooGateway::new(config)?))
}

/// Retry an async request with exponential backoff.
///
/// Only transient failures (timeouts, connection errors, 5xx, 429) are
/// retried; anything else is returned on the first attempt.
pub async fn retry<T, F, Fut>(max_retries: u32, base_delay: Duration, f: F) -> Result<T, GatewayError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) if e.is_transient() && attempt < max_retries => {
                let delay = backoff_delay(base_delay, attempt);
                warn!(attempt = attempt + 1, ?delay, error = %e, "transient gateway error, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Longest wait between two attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// `base_delay · 2^attempt`, capped at [`MAX_BACKOFF`].
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}
