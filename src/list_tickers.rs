use crate::config::ScreenerConfig;

/// Print the configured ticker universe and the default selection.
pub fn run(config: &ScreenerConfig) -> anyhow::Result<()> {
    println!("Ticker universe ({}):", config.tickers.universe.len());
    for chunk in config.tickers.universe.chunks(8) {
        println!("  {}", chunk.join("  "));
    }
    println!();
    println!("Default selection ({}):", config.tickers.default.len());
    for chunk in config.tickers.default.chunks(8) {
        println!("  {}", chunk.join("  "));
    }
    println!();
    println!(
        "Mode: {:?}, at most {} tickers per screen",
        config.screen.mode, config.screen.max_tickers
    );
    Ok(())
}
