use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::screener::ScreenMode;

pub const DEFAULT_CONFIG_FILE: &str = "screener.toml";

/// Browser user agent; the provider rejects session setup for bare clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Upper bound on `gateway.retries`; backoff doubles per attempt.
pub const MAX_RETRIES: u32 = 10;

const DEFAULT_UNIVERSE: [&str; 21] = [
    "AAPL", "PLTR", "GOOGL", "MSFT", "SHOP", "RKLB", "SOFI", "SPY", "NVDA", "NIO", "TSLA", "IONQ",
    "ASTS", "TMDX", "ENVX", "DOCN", "EOSE", "LMND", "AMZN", "AXON", "ALAB",
];

/// Top-level configuration, read from `screener.toml`.
///
/// Every section and field is optional; anything left out takes its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub tickers: TickersConfig,
    pub gateway: GatewayConfig,
    pub screen: ScreenConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickersConfig {
    /// Symbols offered for selection.
    pub universe: Vec<String>,
    /// Symbols screened when no explicit selection is given.
    pub default: Vec<String>,
}

impl Default for TickersConfig {
    fn default() -> Self {
        let universe: Vec<String> = DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect();
        Self {
            default: universe.clone(),
            universe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Page that hands out the session cookie the crumb is bound to.
    pub cookie_url: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            timeout_secs: 20,
            retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub mode: ScreenMode,
    /// Upper bound on tickers in one screening request.
    pub max_tickers: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            mode: ScreenMode::Sequential,
            max_tickers: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl ScreenerConfig {
    /// Load and validate configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: ScreenerConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if the file exists, otherwise use built-in defaults.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Trim and upper-case the configured symbols, dropping blanks and
    /// repeats, the same way a requested selection is treated.
    pub fn normalized(mut self) -> Self {
        self.tickers.universe = normalize_symbols(&self.tickers.universe);
        self.tickers.default = normalize_symbols(&self.tickers.default);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.universe.is_empty() {
            return Err(ConfigError::Invalid("tickers.universe is empty".into()));
        }
        if self.tickers.default.is_empty() {
            return Err(ConfigError::Invalid("tickers.default is empty".into()));
        }
        if self.screen.max_tickers == 0 {
            return Err(ConfigError::Invalid("screen.max_tickers must be at least 1".into()));
        }
        if self.tickers.default.len() > self.screen.max_tickers {
            return Err(ConfigError::Invalid(format!(
                "tickers.default has {} symbols, screen.max_tickers allows {}",
                self.tickers.default.len(),
                self.screen.max_tickers
            )));
        }
        if self.gateway.retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "gateway.retries must be at most {MAX_RETRIES}, got {}",
                self.gateway.retries
            )));
        }
        Ok(())
    }

    /// Normalize a requested selection: trimmed, upper-cased, de-duplicated,
    /// first occurrence wins. An empty request yields the default selection.
    ///
    /// Symbols outside the universe are allowed; the universe only feeds the
    /// selection widgets.
    pub fn resolve_selection<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>, ConfigError> {
        let mut selection = normalize_symbols(requested);

        if selection.is_empty() {
            selection = self.tickers.default.clone();
        }

        if selection.len() > self.screen.max_tickers {
            return Err(ConfigError::TooManyTickers {
                requested: selection.len(),
                max: self.screen.max_tickers,
            });
        }
        Ok(selection)
    }
}

fn normalize_symbols<S: AsRef<str>>(symbols: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for symbol in symbols {
        let symbol = symbol.as_ref().trim().to_uppercase();
        if !symbol.is_empty() && !out.contains(&symbol) {
            out.push(symbol);
        }
    }
    out
}

/// Split a comma-separated ticker list (`"AAPL, msft,,spy"`).
pub fn parse_ticker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
