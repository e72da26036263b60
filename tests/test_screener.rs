
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};

use options_screener::api::error::ApiError;
use options_screener::api::handlers;
use options_screener::api::state::AppState;
use options_screener::api::types::ScreenQuery;
use options_screener::config::ScreenerConfig;
use options_screener::evaluation::Evaluation;
use options_screener::gateway::MarketDataGateway;
use options_screener::model::{ScreenReport, TickerOutcome};
use options_screener::screener::{ScreenMode, screen_all, screen_ticker};

use mock_common::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn gateway_with(list: &[&str]) -> MockGateway {
    list.iter().fold(MockGateway::new(), |g, s| {
        g.with(s, MockTicker::healthy(s, 100.0))
    })
}

// ── Pipeline ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_screen_ticker_builds_full_row() {
    let gateway = gateway_with(&["AAPL"]);
    let row = screen_ticker(&gateway, "AAPL", today()).await.unwrap();

    assert_eq!(row.ticker, "AAPL");
    assert_eq!(row.company.as_deref(), Some("AAPL Corp"));
    assert_eq!(row.expiration, date(2024, 5, 17));
    assert!(row.rsi.is_some());
    assert!(row.moving_average_200.is_some());
    assert!(row.put_strike < row.current_price);
    assert!(row.call_strike > row.current_price);

    let high = row.bollinger_high.unwrap();
    let expected = -((high - row.current_price) / row.current_price) * 100.0;
    assert!((row.bollinger_high_pct.unwrap() - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_company_info_is_not_fatal() {
    let mut ticker = MockTicker::healthy("SPY", 100.0);
    ticker.info = None;
    let gateway = MockGateway::new().with("SPY", ticker);

    let row = screen_ticker(&gateway, "SPY", today()).await.unwrap();
    assert_eq!(row.company, None);
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let mut no_puts = MockTicker::healthy("TSLA", 100.0);
    for chain in no_puts.chains.values_mut() {
        chain.puts.retain(|q| q.strike > 200.0);
    }
    let gateway: Arc<dyn MarketDataGateway> = Arc::new(gateway_with(&["AAPL", "MSFT"]).with("TSLA", no_puts));

    let tickers = symbols(&["AAPL", "ZZZZ", "TSLA", "MSFT"]);
    let outcomes = screen_all(gateway, &tickers, ScreenMode::Sequential, today(), None).await;

    let order: Vec<&str> = outcomes.iter().map(|o| o.ticker()).collect();
    assert_eq!(order, vec!["AAPL", "ZZZZ", "TSLA", "MSFT"]);
    assert!(matches!(outcomes[0], TickerOutcome::Evaluated(_)));
    assert!(matches!(outcomes[3], TickerOutcome::Evaluated(_)));

    match &outcomes[1] {
        TickerOutcome::Failed(f) => assert!(f.error.contains("ZZZZ")),
        other => panic!("expected failure, got {other:?}"),
    }
    match &outcomes[2] {
        TickerOutcome::Failed(f) => assert!(f.error.contains("no put strike"), "{}", f.error),
        other => panic!("expected failure, got {other:?}"),
    }

    let report = ScreenReport::from_outcomes(outcomes);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.failures.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_keeps_input_order() {
    // Earlier tickers are slower, so they finish last.
    let list = ["NVDA", "AMZN", "GOOGL", "SOFI"];
    let mut gateway = MockGateway::new();
    for (i, s) in list.iter().enumerate() {
        let mut ticker = MockTicker::healthy(s, 50.0 + i as f64 * 10.0);
        ticker.delay = Duration::from_millis(((list.len() - i) * 15) as u64);
        gateway = gateway.with(s, ticker);
    }
    let gateway: Arc<dyn MarketDataGateway> = Arc::new(gateway);

    let tickers = symbols(&list);
    let parallel = screen_all(gateway.clone(), &tickers, ScreenMode::Parallel, today(), None).await;
    let sequential = screen_all(gateway, &tickers, ScreenMode::Sequential, today(), None).await;

    let order: Vec<&str> = parallel.iter().map(|o| o.ticker()).collect();
    assert_eq!(order, list.to_vec());
    assert_eq!(parallel, sequential);
}

#[tokio::test]
async fn test_empty_history_fails_ticker() {
    let mut ticker = MockTicker::healthy("ALAB", 100.0);
    ticker.year = history_from(&[], date(2024, 4, 30));
    let gateway: Arc<dyn MarketDataGateway> = Arc::new(MockGateway::new().with("ALAB", ticker));

    let outcomes = screen_all(gateway, &symbols(&["ALAB"]), ScreenMode::Sequential, today(), None).await;
    match &outcomes[0] {
        TickerOutcome::Failed(f) => assert!(f.error.contains("empty"), "{}", f.error),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_flat_trend_is_neutral() {
    let gateway = gateway_with(&["SPY"]);
    let row = screen_ticker(&gateway, "SPY", today()).await.unwrap();
    assert_eq!(row.evaluation, Evaluation::Neutral);
}

// ── API handlers ─────────────────────────────────────────────────────

fn app_state(list: &[&str], max_tickers: usize) -> AppState {
    let mut config = ScreenerConfig::default();
    config.tickers.universe = symbols(list);
    config.tickers.default = symbols(&list[..1]);
    config.screen.max_tickers = max_tickers;
    AppState::new(config, Arc::new(gateway_with(list)))
}

#[tokio::test]
async fn test_api_lists_tickers() {
    let state = app_state(&["AAPL", "MSFT"], 5);
    let body = handlers::screen::list_tickers(State(state)).await.0;
    assert_eq!(body.universe, vec!["AAPL", "MSFT"]);
    assert_eq!(body.default, vec!["AAPL"]);
    assert_eq!(body.max_tickers, 5);
}

#[tokio::test]
async fn test_api_screen_defaults_and_explicit_selection() {
    let state = app_state(&["AAPL", "MSFT"], 5);

    let body = handlers::screen::screen(State(state.clone()), Query(ScreenQuery::default()))
        .await
        .unwrap()
        .0;
    assert_eq!(body.selection, vec!["AAPL"]);
    assert_eq!(body.rows.len(), 1);

    let query = ScreenQuery {
        tickers: Some("msft, ZZZZ".into()),
    };
    let body = handlers::screen::screen(State(state), Query(query)).await.unwrap().0;
    assert_eq!(body.selection, vec!["MSFT", "ZZZZ"]);
    assert_eq!(body.rows[0].ticker, "MSFT");
    assert_eq!(body.failures[0].ticker, "ZZZZ");
}

#[tokio::test]
async fn test_api_rejects_oversized_selection() {
    let state = app_state(&["AAPL", "MSFT"], 1);
    let query = ScreenQuery {
        tickers: Some("AAPL,MSFT".into()),
    };
    let err = handlers::screen::screen(State(state), Query(query)).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn test_empty_tickers_parameter_screens_nothing() {
    let state = app_state(&["AAPL", "MSFT"], 5);
    let query = ScreenQuery {
        tickers: Some(" , ".into()),
    };
    let body = handlers::screen::screen(State(state.clone()), Query(query)).await.unwrap().0;
    assert!(body.selection.is_empty());
    assert!(body.rows.is_empty() && body.failures.is_empty());

    let query = ScreenQuery {
        tickers: Some(String::new()),
    };
    let html = handlers::dashboard::dashboard(State(state), Query(query)).await.unwrap().0;
    assert!(html.contains("Select ticker symbols and press Screen."));
    assert!(!html.contains("<table>"));
}

#[tokio::test]
async fn test_dashboard_renders_selection() {
    let state = app_state(&["AAPL", "MSFT"], 5);
    let query = ScreenQuery {
        tickers: Some("MSFT".into()),
    };
    let html = handlers::dashboard::dashboard(State(state), Query(query)).await.unwrap().0;
    assert!(html.contains("<option value=\"MSFT\" selected>MSFT</option>"));
    assert!(html.contains("<option value=\"AAPL\">AAPL</option>"));
    assert!(html.contains("<td class=\"text\">MSFT</td>"));
}
