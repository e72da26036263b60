use axum::extract::{Query, State};
use axum::response::Html;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::ScreenQuery;
use crate::report::render_dashboard;

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<ScreenQuery>,
) -> Result<Html<String>, ApiError> {
    let (selection, report) = super::run_screen(&state, &query).await?;
    Ok(Html(render_dashboard(
        &report,
        &state.inner.config.tickers.universe,
        &selection,
    )))
}
