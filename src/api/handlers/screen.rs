use axum::Json;
use axum::extract::{Query, State};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{ScreenQuery, ScreenResponse, TickersResponse};

pub async fn list_tickers(State(state): State<AppState>) -> Json<TickersResponse> {
    let config = &state.inner.config;
    Json(TickersResponse {
        universe: config.tickers.universe.clone(),
        default: config.tickers.default.clone(),
        max_tickers: config.screen.max_tickers,
    })
}

pub async fn screen(
    State(state): State<AppState>,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<ScreenResponse>, ApiError> {
    let (selection, report) = super::run_screen(&state, &query).await?;
    Ok(Json(ScreenResponse {
        selection,
        rows: report.rows,
        failures: report.failures,
    }))
}
