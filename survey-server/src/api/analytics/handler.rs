//! Analytics API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono_tz::Tz;
use serde::Deserialize;

use shared::models::{AnalyticsDto, QuestionStatisticDto, TimeWindow};

use crate::analytics::AnalyticsService;
use crate::core::ServerState;
use crate::utils::time;
use crate::utils::{AppError, AppResult};

/// Query params: `from` / `to` are inclusive business dates (YYYY-MM-DD)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub survey_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Turn the optional date pair into a `[from, to)` window
pub fn resolve_window(query: &AnalyticsQuery, tz: Tz) -> AppResult<Option<TimeWindow>> {
    match (query.from.as_deref(), query.to.as_deref()) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let (start, end) =
                time::date_range_millis(time::parse_date(from)?, time::parse_date(to)?, tz)?;
            TimeWindow::new(start, end)
                .map(Some)
                .ok_or_else(|| AppError::validation("Invalid time window"))
        }
        _ => Err(AppError::validation(
            "Both 'from' and 'to' must be provided together",
        )),
    }
}

/// GET /api/analytics - 统计概览
pub async fn survey_analytics(
    State(state): State<ServerState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AnalyticsDto>> {
    let window = resolve_window(&query, state.config.timezone)?;
    let dto = AnalyticsService::from_state(&state)
        .survey_analytics(query.survey_id, window)
        .await?;
    Ok(Json(dto))
}

/// GET /api/surveys/{id}/questions/statistics - 逐题统计
pub async fn question_statistics(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<QuestionStatisticDto>>> {
    let stats = AnalyticsService::from_state(&state)
        .question_statistics(id)
        .await?;
    Ok(Json(stats))
}
