use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Supported log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => write!(f, "plain"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl From<&str> for LogFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// Install the global tracing subscriber, writing to stderr so table and
/// export output on stdout stay clean.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this a
/// second time is a no-op.
pub fn init_logger(log_level: &str, log_format: &str) -> Result<(), ConfigError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.is_empty() => EnvFilter::try_new(from_env),
        _ => EnvFilter::try_new(log_level),
    }
    .map_err(|e| ConfigError::Invalid(format!("log level `{log_level}`: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // An already-installed subscriber is fine (tests, repeated calls).
    let _ = match LogFormat::from(log_format) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };

    Ok(())
}
