use std::fmt::Write;

use crate::model::{ScreenReport, TickerResult};
use crate::pricing::{StrikePick, StrikeRecommendation};

use super::palette::{ANSI_RESET, ColumnScale, Rgb};

const WIDTH: usize = 150;

/// Per-column color scales for the RSI and the two band percentages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableScales {
    pub rsi: Option<ColumnScale>,
    pub high_pct: Option<ColumnScale>,
    pub low_pct: Option<ColumnScale>,
}

impl TableScales {
    pub fn for_rows(rows: &[TickerResult]) -> Self {
        Self {
            rsi: ColumnScale::from_values(rows.iter().map(|r| r.rsi)),
            high_pct: ColumnScale::from_values(rows.iter().map(|r| r.bollinger_high_pct)),
            low_pct: ColumnScale::from_values(rows.iter().map(|r| r.bollinger_low_pct)),
        }
    }
}

/// Render the screening table. With `color` the RSI, High % and Low %
/// columns get ANSI backgrounds from the diverging scale.
pub fn render_table(report: &ScreenReport, color: bool) -> String {
    let scales = TableScales::for_rows(&report.rows);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "═".repeat(WIDTH));
    let _ = writeln!(out, "  Options Screen ({} tickers)", report.rows.len() + report.failures.len());
    let _ = writeln!(out, "{}", "═".repeat(WIDTH));
    let _ = writeln!(
        out,
        "  {:<6} {:>9} {:>6} {:>9} {:>7} {:>9} {:>7} {:>9} {:>8} {:>8} {:>10} {:>7} {:>7} {:>6} {:>6}  {}",
        "Ticker",
        "Price",
        "RSI",
        "BB High",
        "High%",
        "BB Low",
        "Low%",
        "MA200",
        "Put K",
        "Call K",
        "Expiry",
        "Put $",
        "Call $",
        "Put Δ",
        "Call Δ",
        "Evaluation",
    );
    let _ = writeln!(out, "  {}", "─".repeat(WIDTH - 2));

    for r in &report.rows {
        let rsi = paint(num(r.rsi, 6, 1), color.then(|| scales.rsi.and_then(|s| s.color(r.rsi))).flatten());
        let high_pct = paint(
            num(r.bollinger_high_pct, 7, 2),
            color.then(|| scales.high_pct.and_then(|s| s.color(r.bollinger_high_pct))).flatten(),
        );
        let low_pct = paint(
            num(r.bollinger_low_pct, 7, 2),
            color.then(|| scales.low_pct.and_then(|s| s.color(r.bollinger_low_pct))).flatten(),
        );

        let _ = writeln!(
            out,
            "  {:<6} {:>9.2} {} {} {} {} {} {} {:>8.2} {:>8.2} {:>10} {:>7.2} {:>7.2} {:>6.3} {:>6.3}  {}",
            r.ticker,
            r.current_price,
            rsi,
            num(r.bollinger_high, 9, 2),
            high_pct,
            num(r.bollinger_low, 9, 2),
            low_pct,
            num(r.moving_average_200, 9, 2),
            r.put_strike,
            r.call_strike,
            r.expiration.format("%Y-%m-%d").to_string(),
            r.put_premium,
            r.call_premium,
            r.put_delta,
            r.call_delta,
            r.evaluation,
        );
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "  {}", "─".repeat(WIDTH - 2));
        for f in &report.failures {
            let _ = writeln!(out, "  {:<6} FAILED  {}", f.ticker, f.error);
        }
    }
    let _ = writeln!(out, "{}", "═".repeat(WIDTH));
    out
}

/// Print the screening table to stdout.
pub fn print_table(report: &ScreenReport) {
    print!("{}", render_table(report, true));
}

/// Render the strike recommendation for one ticker.
pub fn render_recommendation(symbol: &str, rec: &StrikeRecommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "═".repeat(68));
    let _ = writeln!(out, "  {} strikes for {}", symbol, rec.expiration.format("%Y-%m-%d"));
    let _ = writeln!(out, "{}", "═".repeat(68));
    let _ = writeln!(
        out,
        "  Price: {:.2}   Volatility: {:.2}%",
        rec.current_price,
        rec.volatility * 100.0
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {:<6} {:>10} {:>10} {:>8}  {}", "Side", "Strike", "Premium", "Delta", "Selection");
    let _ = writeln!(out, "  {}", "─".repeat(52));
    for (side, pick) in [("Put", &rec.put), ("Call", &rec.call)] {
        let _ = writeln!(
            out,
            "  {:<6} {:>10.2} {:>10.2} {:>8.3}  {}",
            side,
            pick.strike,
            pick.premium,
            pick.delta,
            selection_label(pick)
        );
    }
    let _ = writeln!(out, "{}", "═".repeat(68));
    out
}

fn selection_label(pick: &StrikePick) -> &'static str {
    if pick.qualified { "delta band" } else { "nearest strike" }
}

fn num(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:>width$.precision$}"),
        None => format!("{:>width$}", "-"),
    }
}

fn paint(text: String, bg: Option<Rgb>) -> String {
    match bg {
        Some(bg) => {
            let fg = bg.text_color();
            format!("{}\x1b[38;2;{};{};{}m{}{}", bg.ansi_bg(), fg.0, fg.1, fg.2, text, ANSI_RESET)
        }
        None => text,
    }
}
