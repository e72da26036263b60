use std::fmt::Write;

use crate::model::{ScreenReport, TickerResult};

use super::palette::Rgb;
use super::table::TableScales;

const STYLE: &str = "
body { font-family: -apple-system, Segoe UI, Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }
h1 { margin-bottom: 0.5rem; }
.rules li { margin: 0.25rem 0; }
.puts { color: #1f4fa8; font-weight: 600; }
.calls { color: #b3202f; font-weight: 600; }
form { margin: 1rem 0; }
select { min-width: 12rem; }
table { border-collapse: collapse; font-size: 0.85rem; }
th, td { border: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: right; white-space: nowrap; }
th { background: #f5f5f5; position: sticky; top: 0; }
td.text { text-align: left; }
.failures { color: #b3202f; }
";

const SCRIPT: &str = "
document.getElementById('screen-form').addEventListener('submit', function () {
  var picked = Array.from(document.getElementById('ticker-select').selectedOptions).map(function (o) { return o.value; });
  document.getElementById('tickers').value = picked.join(',');
});
";

const COLUMNS: [&str; 17] = [
    "Ticker",
    "Company",
    "Current Price",
    "RSI",
    "Bollinger High",
    "Bollinger High %",
    "Bollinger Low",
    "Bollinger Low %",
    "200-day MA",
    "Evaluation",
    "Put Strike Price",
    "Call Strike Price",
    "Expiration Date",
    "Put Premium",
    "Call Premium",
    "Put Delta",
    "Call Delta",
];

/// Render the dashboard page: rule explanation, ticker selection form, the
/// colored result table, and any failed tickers.
pub fn render_dashboard(report: &ScreenReport, universe: &[String], selected: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>Stock Analysis and Option Recommendations</title>");
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>Stock Analysis and Option Recommendations</h1>");

    let _ = writeln!(out, "<h3>How a Stock is Marked Good for Selling an Option:</h3>");
    let _ = writeln!(out, "<ul class=\"rules\">");
    let _ = writeln!(
        out,
        "<li><span class=\"puts\">Good for selling puts</span>: If the RSI is below 30, the current price \
         is below the lower Bollinger Band, and the current price is above the 200-day moving average.</li>"
    );
    let _ = writeln!(
        out,
        "<li><span class=\"calls\">Good for selling calls</span>: If the RSI is above 70, the current price \
         is above the upper Bollinger Band, and the current price is below the 200-day moving average.</li>"
    );
    let _ = writeln!(out, "</ul>");

    write_form(&mut out, universe, selected);
    if selected.is_empty() {
        let _ = writeln!(out, "<p>Select ticker symbols and press Screen.</p>");
    } else {
        write_table(&mut out, &report.rows);
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "<h3>Failed tickers</h3>\n<ul class=\"failures\">");
        for f in &report.failures {
            let _ = writeln!(out, "<li><b>{}</b>: {}</li>", escape(&f.ticker), escape(&f.error));
        }
        let _ = writeln!(out, "</ul>");
    }

    let _ = writeln!(out, "<script>{SCRIPT}</script>\n</body>\n</html>");
    out
}

fn write_form(out: &mut String, universe: &[String], selected: &[String]) {
    let _ = writeln!(out, "<form id=\"screen-form\" method=\"get\" action=\"/dashboard\">");
    let _ = writeln!(out, "<label for=\"ticker-select\">Select Ticker Symbols</label><br>");
    let _ = writeln!(
        out,
        "<select id=\"ticker-select\" multiple size=\"{}\">",
        universe.len().clamp(4, 12)
    );

    // Selected symbols outside the universe stay visible and selected.
    let extra = selected.iter().filter(|s| !universe.contains(*s));
    for symbol in universe.iter().chain(extra) {
        let attr = if selected.contains(symbol) { " selected" } else { "" };
        let symbol = escape(symbol);
        let _ = writeln!(out, "<option value=\"{symbol}\"{attr}>{symbol}</option>");
    }
    let _ = writeln!(out, "</select>");
    let _ = writeln!(
        out,
        "<input type=\"hidden\" id=\"tickers\" name=\"tickers\" value=\"{}\">",
        escape(&selected.join(","))
    );
    let _ = writeln!(out, "<button type=\"submit\">Screen</button>\n</form>");
}

fn write_table(out: &mut String, rows: &[TickerResult]) {
    if rows.is_empty() {
        let _ = writeln!(out, "<p>No tickers could be evaluated.</p>");
        return;
    }

    let scales = TableScales::for_rows(rows);
    let _ = writeln!(out, "<table>\n<thead><tr>");
    for column in COLUMNS {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    let _ = writeln!(out, "</tr></thead>\n<tbody>");

    for r in rows {
        let _ = write!(out, "<tr>");
        text_cell(out, &r.ticker);
        text_cell(out, r.company.as_deref().unwrap_or(""));
        num_cell(out, Some(r.current_price), 2, None);
        num_cell(out, r.rsi, 2, scales.rsi.and_then(|s| s.color(r.rsi)));
        num_cell(out, r.bollinger_high, 2, None);
        num_cell(
            out,
            r.bollinger_high_pct,
            2,
            scales.high_pct.and_then(|s| s.color(r.bollinger_high_pct)),
        );
        num_cell(out, r.bollinger_low, 2, None);
        num_cell(
            out,
            r.bollinger_low_pct,
            2,
            scales.low_pct.and_then(|s| s.color(r.bollinger_low_pct)),
        );
        num_cell(out, r.moving_average_200, 2, None);
        text_cell(out, r.evaluation.label());
        num_cell(out, Some(r.put_strike), 2, None);
        num_cell(out, Some(r.call_strike), 2, None);
        text_cell(out, &r.expiration.format("%Y-%m-%d").to_string());
        num_cell(out, Some(r.put_premium), 2, None);
        num_cell(out, Some(r.call_premium), 2, None);
        num_cell(out, Some(r.put_delta), 4, None);
        num_cell(out, Some(r.call_delta), 4, None);
        let _ = writeln!(out, "</tr>");
    }
    let _ = writeln!(out, "</tbody>\n</table>");
}

fn text_cell(out: &mut String, text: &str) {
    let _ = write!(out, "<td class=\"text\">{}</td>", escape(text));
}

fn num_cell(out: &mut String, value: Option<f64>, precision: usize, bg: Option<Rgb>) {
    let text = value.map_or_else(String::new, |v| format!("{v:.precision$}"));
    match bg {
        Some(bg) => {
            let _ = write!(
                out,
                "<td style=\"background-color: {}; color: {}\">{}</td>",
                bg.hex(),
                bg.text_color().hex(),
                text
            );
        }
        None => {
            let _ = write!(out, "<td>{text}</td>");
        }
    }
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
