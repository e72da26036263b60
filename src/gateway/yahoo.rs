use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::model::{CompanyInfo, HistoryPeriod, OptionChain, OptionQuote, PriceHistory, PricePoint};

use super::{MarketDataGateway, retry};

const BACKOFF_BASE_MS: u64 = 500;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProviderFault {
    code: Option<String>,
    description: Option<String>,
}

impl ProviderFault {
    fn reason(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(desc)) => format!("{code}: {desc}"),
            (Some(s), None) | (None, Some(s)) => s.clone(),
            (None, None) => "unknown provider error".to_string(),
        }
    }
}

/// Body of a rejected request, e.g. a 401 for a missing or stale crumb.
#[derive(Debug, Deserialize)]
struct FinanceEnvelope {
    finance: FinanceFault,
}

#[derive(Debug, Deserialize)]
struct FinanceFault {
    error: Option<ProviderFault>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ResultSet<ChartResult>,
}

#[derive(Debug, Deserialize)]
struct OptionsEnvelope {
    #[serde(rename = "optionChain")]
    option_chain: ResultSet<OptionsResult>,
}

#[derive(Debug, Deserialize)]
struct ResultSet<R> {
    result: Option<Vec<R>>,
    error: Option<ProviderFault>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    currency: Option<String>,
    exchange_name: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResult {
    #[serde(default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<OptionsForDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsForDate {
    expiration_date: i64,
    #[serde(default)]
    calls: Vec<ContractRow>,
    #[serde(default)]
    puts: Vec<ContractRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractRow {
    strike: f64,
    #[serde(default)]
    last_price: f64,
}

// ── Gateway ──────────────────────────────────────────────────────────

/// Yahoo Finance chart and options endpoints over HTTP.
///
/// The options endpoint needs a crumb tied to a session cookie. Both are
/// obtained on the first options request and reused for the gateway's
/// lifetime.
pub struct YahooGateway {
    client: reqwest::Client,
    base_url: String,
    cookie_url: String,
    retries: u32,
    crumb: OnceCell<String>,
}

impl YahooGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url.clone(),
            retries: config.retries,
            crumb: OnceCell::new(),
        })
    }

    async fn crumb(&self) -> Result<&str, GatewayError> {
        self.crumb
            .get_or_try_init(|| self.open_session())
            .await
            .map(String::as_str)
    }

    async fn open_session(&self) -> Result<String, GatewayError> {
        let client = &self.client;
        let cookie_url = self.cookie_url.as_str();
        let crumb_url = format!("{}/v1/test/getcrumb", self.base_url);
        let crumb_url = crumb_url.as_str();

        let crumb = retry(self.retries, Duration::from_millis(BACKOFF_BASE_MS), move || async move {
            // Only the Set-Cookie header matters here, not the status.
            client.get(cookie_url).send().await?;
            let resp = client.get(crumb_url).send().await?;
            let status = resp.status();
            if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                resp.error_for_status_ref()?;
            }
            let body = resp.text().await?;
            parse_crumb(status, &body)
        })
        .await?;

        info!("provider session opened");
        Ok(crumb)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        symbol: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let client = &self.client;
        retry(self.retries, Duration::from_millis(BACKOFF_BASE_MS), move || async move {
            debug!(url, ?query, "GET");
            let resp = client.get(url).query(query).send().await?;
            let status = resp.status();
            if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                resp.error_for_status_ref()?;
            }
            let body = resp.bytes().await?;
            // 4xx bodies still carry the provider's error envelope.
            serde_json::from_slice::<T>(&body).map_err(|e| {
                if status.is_success() {
                    GatewayError::Malformed {
                        symbol: symbol.to_string(),
                        reason: e.to_string(),
                    }
                } else {
                    rejection(symbol, status, &body)
                }
            })
        })
        .await
    }

    async fn chart(&self, symbol: &str, range: &str) -> Result<ChartResult, GatewayError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let query = [("range", range.to_string()), ("interval", "1d".to_string())];
        let envelope: ChartEnvelope = self.get_json(symbol, &url, &query).await?;
        first_result(symbol, envelope.chart)
    }

    async fn options(&self, symbol: &str, date: Option<NaiveDate>) -> Result<OptionsResult, GatewayError> {
        let url = format!("{}/v7/finance/options/{}", self.base_url, symbol);
        let mut query = vec![("crumb", self.crumb().await?.to_string())];
        if let Some(d) = date {
            query.push(("date", date_to_unix(d).to_string()));
        }
        let envelope: OptionsEnvelope = self.get_json(symbol, &url, &query).await?;
        first_result(symbol, envelope.option_chain)
    }
}

#[async_trait]
impl MarketDataGateway for YahooGateway {
    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, GatewayError> {
        let chart = self.chart(symbol, HistoryPeriod::OneDay.as_range()).await?;
        Ok(company_from_meta(chart.meta))
    }

    async fn price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceHistory, GatewayError> {
        let chart = self.chart(symbol, period.as_range()).await?;
        Ok(history_from_chart(&chart))
    }

    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, GatewayError> {
        let result = self.options(symbol, None).await?;
        let mut dates: Vec<NaiveDate> = result
            .expiration_dates
            .iter()
            .filter_map(|&ts| unix_to_date(ts))
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, GatewayError> {
        let result = self.options(symbol, Some(expiration)).await?;
        chain_from_options(symbol, expiration, result)
    }
}

// ── Conversions ──────────────────────────────────────────────────────

fn first_result<R>(symbol: &str, set: ResultSet<R>) -> Result<R, GatewayError> {
    if let Some(fault) = set.error {
        return Err(GatewayError::Provider {
            symbol: symbol.to_string(),
            reason: fault.reason(),
        });
    }
    set.result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| GatewayError::NoData {
            symbol: symbol.to_string(),
        })
}

/// Map a non-2xx body to a provider error, keeping the provider's reason
/// when the body is a `finance.error` envelope.
fn rejection(symbol: &str, status: StatusCode, body: &[u8]) -> GatewayError {
    let fault = serde_json::from_slice::<FinanceEnvelope>(body)
        .ok()
        .and_then(|e| e.finance.error);
    let reason = match fault {
        Some(fault) => format!("HTTP {}: {}", status.as_u16(), fault.reason()),
        None => format!("HTTP {}", status.as_u16()),
    };
    GatewayError::Provider {
        symbol: symbol.to_string(),
        reason,
    }
}

/// A crumb is a short opaque token; anything else means the session was refused.
fn parse_crumb(status: StatusCode, body: &str) -> Result<String, GatewayError> {
    let crumb = body.trim();
    if status.is_success() && !crumb.is_empty() && !crumb.contains(['<', '{', ' ']) {
        Ok(crumb.to_string())
    } else {
        Err(GatewayError::Session {
            reason: format!("crumb request answered HTTP {}", status.as_u16()),
        })
    }
}

fn company_from_meta(meta: ChartMeta) -> CompanyInfo {
    CompanyInfo {
        symbol: meta.symbol,
        name: meta.long_name.or(meta.short_name),
        currency: meta.currency,
        exchange: meta.exchange_name,
    }
}

/// Pair timestamps with closes, dropping sessions without a close.
/// Dates are taken in the exchange's local time.
fn history_from_chart(chart: &ChartResult) -> PriceHistory {
    let closes = chart
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or_default();

    let points = chart
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let close = (*close)?;
            let date = unix_to_date(ts + chart.meta.gmtoffset)?;
            close.is_finite().then_some(PricePoint { date, close })
        })
        .collect();

    PriceHistory::new(points)
}

fn chain_from_options(
    symbol: &str,
    expiration: NaiveDate,
    result: OptionsResult,
) -> Result<OptionChain, GatewayError> {
    let block = result
        .options
        .into_iter()
        .find(|o| unix_to_date(o.expiration_date) == Some(expiration))
        .ok_or_else(|| GatewayError::NoData {
            symbol: symbol.to_string(),
        })?;

    let quotes = |rows: Vec<ContractRow>| -> Vec<OptionQuote> {
        rows.into_iter()
            .map(|r| OptionQuote {
                strike: r.strike,
                last_price: r.last_price,
            })
            .collect()
    };

    Ok(OptionChain {
        expiration,
        puts: quotes(block.puts),
        calls: quotes(block.calls),
    })
}

fn unix_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

fn date_to_unix(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "AAPL",
                    "currency": "USD",
                    "exchangeName": "NMS",
                    "longName": "Apple Inc.",
                    "gmtoffset": -14400
                },
                "timestamp": [1714656600, 1714743000, 1714570200],
                "indicators": { "quote": [{ "close": [173.03, null, 169.3] }] }
            }],
            "error": null
        }
    }"#;

    const OPTIONS: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "AAPL",
                "expirationDates": [1715904000, 1715299200],
                "options": [{
                    "expirationDate": 1715904000,
                    "calls": [{ "strike": 180.0, "lastPrice": 1.25 }],
                    "puts": [{ "strike": 165.0, "lastPrice": 0.8 }, { "strike": 170.0 }]
                }]
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_history_skips_null_closes() {
        let envelope: ChartEnvelope = serde_json::from_str(CHART).unwrap();
        let chart = first_result("AAPL", envelope.chart).unwrap();
        let history = history_from_chart(&chart);
        assert_eq!(history.closes(), vec![169.3, 173.03]);
        assert_eq!(history.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn test_company_prefers_long_name() {
        let envelope: ChartEnvelope = serde_json::from_str(CHART).unwrap();
        let chart = first_result("AAPL", envelope.chart).unwrap();
        let info = company_from_meta(chart.meta);
        assert_eq!(info.name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.exchange.as_deref(), Some("NMS"));
    }

    #[test]
    fn test_provider_error_envelope() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        let err = first_result("ZZZZ", envelope.chart).unwrap_err();
        assert!(matches!(err, GatewayError::Provider { ref reason, .. } if reason.starts_with("Not Found")));
    }

    #[test]
    fn test_invalid_crumb_rejection() {
        let body = br#"{"finance":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#;
        let err = rejection("AAPL", StatusCode::UNAUTHORIZED, body);
        match err {
            GatewayError::Provider { symbol, reason } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(reason, "HTTP 401: Unauthorized: Invalid Crumb");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
        assert!(!rejection("AAPL", StatusCode::UNAUTHORIZED, body).is_transient());
    }

    #[test]
    fn test_rejection_without_envelope() {
        let err = rejection("AAPL", StatusCode::FORBIDDEN, b"<html>denied</html>");
        assert!(matches!(err, GatewayError::Provider { ref reason, .. } if reason == "HTTP 403"));
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb(StatusCode::OK, "Xa1b2C3d/eF\n").unwrap(), "Xa1b2C3d/eF");
        assert!(matches!(
            parse_crumb(StatusCode::OK, ""),
            Err(GatewayError::Session { .. })
        ));
        assert!(parse_crumb(StatusCode::OK, "<html>Too Many Requests</html>").is_err());
        assert!(parse_crumb(StatusCode::UNAUTHORIZED, "abc").is_err());
    }

    #[test]
    fn test_chain_for_requested_expiration() {
        let envelope: OptionsEnvelope = serde_json::from_str(OPTIONS).unwrap();
        let result = first_result("AAPL", envelope.option_chain).unwrap();
        let expiration = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(date_to_unix(expiration), 1715904000);

        let chain = chain_from_options("AAPL", expiration, result).unwrap();
        assert_eq!(chain.calls.len(), 1);
        assert_eq!(chain.puts[1].strike, 170.0);
        assert_eq!(chain.puts[1].last_price, 0.0);
    }
}
