use clap::{Parser, Subcommand};
use std::path::PathBuf;

use options_screener::config::DEFAULT_CONFIG_FILE;

/// Options screener: technical indicators, a put/call evaluation rule, and
/// delta-based strike recommendations for a list of equity tickers.
#[derive(Parser)]
#[command(name = "options-screener", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file (built-in defaults when absent)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log level or filter directive (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Screen tickers and print the evaluation table
    Screen {
        /// Comma-separated tickers (default: the configured default selection)
        #[arg(long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Screen all tickers concurrently
        #[arg(long)]
        parallel: bool,

        /// Export the results to a .csv or .json file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the recommended put and call strikes for one ticker
    Strike {
        /// Ticker symbol, e.g. AAPL
        ticker: String,
    },

    /// List the configured ticker universe and default selection
    Tickers,

    /// Serve the HTML dashboard and JSON API
    Serve {
        /// Host to bind (default: [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (default: [server].port)
        #[arg(long)]
        port: Option<u16>,
    },
}
