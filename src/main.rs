use anyhow::Context;
use clap::Parser;

use options_screener::config::ScreenerConfig;
use options_screener::{api, list_tickers, logger, screener};

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let config = ScreenerConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    logger::init_logger(level, &config.log.format)?;

    match cli.command {
        cli::Command::Screen {
            tickers,
            parallel,
            output,
        } => screener::run(&config, &tickers, parallel, output.as_deref()),
        cli::Command::Strike { ticker } => screener::run_strike(&config, &ticker),
        cli::Command::Tickers => list_tickers::run(&config),
        cli::Command::Serve { host, port } => api::run(config, host, port),
    }
}
