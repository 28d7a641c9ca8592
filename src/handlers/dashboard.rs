use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::services::dashboard::{self, HistoryColumn, HistoryRow, SortOrder, Summary};
use crate::AppState;

/// Query parameters for the history table
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Column name as shown in the table, e.g. `Amount` or `Weight(g)`
    pub sort: Option<HistoryColumn>,
    /// `asc` (default) or `desc`
    pub order: Option<SortOrder>,
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, AppError> {
    let records = state.store.load_all().await?;
    Ok(Json(dashboard::summarize(&records)))
}

pub async fn chart(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.store.load_all().await?;
    let totals = dashboard::daily_totals(&records);
    let svg = dashboard::render_chart_svg(&totals)
        .map_err(|e| AppError::Internal(format!("chart rendering failed: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryRow>>, AppError> {
    let records = state.store.load_all().await?;
    let rows = dashboard::history(
        records,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    );
    Ok(Json(rows))
}

/// Irreversible. Confirmation is the caller's responsibility.
pub async fn clear(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.store.clear().await?;
    tracing::warn!("All bill records deleted");
    Ok(Json(json!({ "cleared": true })))
}
