pub mod dashboard;
pub mod screen;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::ScreenQuery;
use crate::config::parse_ticker_list;
use crate::model::ScreenReport;
use crate::screener::{screen_all, today};

/// Resolve the query's selection and screen it with the configured mode.
///
/// No `tickers` parameter means the default selection. A parameter that
/// names no symbol (an empty form submit) screens nothing.
pub(crate) async fn run_screen(
    state: &AppState,
    query: &ScreenQuery,
) -> Result<(Vec<String>, ScreenReport), ApiError> {
    let selection = match query.tickers.as_deref() {
        None => state.inner.config.resolve_selection::<&str>(&[])?,
        Some(raw) => {
            let requested = parse_ticker_list(raw);
            if requested.is_empty() {
                return Ok((Vec::new(), ScreenReport::default()));
            }
            state.inner.config.resolve_selection(&requested)?
        }
    };

    let outcomes = screen_all(
        state.inner.gateway.clone(),
        &selection,
        state.inner.config.screen.mode,
        today(),
        None,
    )
    .await;

    Ok((selection, ScreenReport::from_outcomes(outcomes)))
}
