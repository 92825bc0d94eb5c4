//! Suggestion API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Suggestion, SuggestionCreate, SuggestionStatus, SuggestionStatusUpdate};

use crate::core::ServerState;
use crate::db::repository::suggestion;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_TITLE_LEN, validate_optional_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<SuggestionStatus>,
}

fn validate_create(payload: &SuggestionCreate) -> AppResult<()> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.submitter_name, "submitter name", MAX_NAME_LEN)?;
    validate_optional_email(&payload.submitter_email, "submitter email")?;
    Ok(())
}

/// GET /api/suggestions - 列表 (可按状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Suggestion>>> {
    let items = suggestion::find_all(state.pool(), query.status).await?;
    Ok(Json(items))
}

/// GET /api/suggestions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Suggestion>> {
    let item = suggestion::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::suggestion_not_found(id))?;
    Ok(Json(item))
}

/// POST /api/suggestions - 提交建议或需求
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SuggestionCreate>,
) -> AppResult<Json<Suggestion>> {
    validate_create(&payload)?;
    let item = suggestion::create(state.pool(), payload).await?;
    tracing::info!(suggestion_id = item.id, kind = ?item.kind, "Suggestion submitted");
    Ok(Json(item))
}

/// PUT /api/suggestions/{id}/status - 审核流转
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SuggestionStatusUpdate>,
) -> AppResult<Json<Suggestion>> {
    let current = suggestion::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::suggestion_not_found(id))?;

    if !current.status.can_transition_to(payload.status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidSuggestionTransition,
            format!(
                "Cannot change suggestion status from {:?} to {:?}",
                current.status, payload.status
            ),
        )
        .with_detail("suggestion_id", id));
    }

    let item = suggestion::update_status(state.pool(), id, current.status, payload.status).await?;
    tracing::info!(
        suggestion_id = id,
        from = ?current.status,
        to = ?item.status,
        "Suggestion status changed"
    );
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SuggestionCreate {
        SuggestionCreate {
            kind: Default::default(),
            title: "Export to CSV".into(),
            description: "Allow exporting responses".into(),
            submitter_name: None,
            submitter_email: Some("ops@example.com".into()),
            priority: None,
        }
    }

    #[test]
    fn test_valid_suggestion_passes() {
        assert!(validate_create(&payload()).is_ok());
    }

    #[test]
    fn test_blank_description_is_rejected() {
        let mut p = payload();
        p.description = "   ".into();
        assert!(validate_create(&p).is_err());
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut p = payload();
        p.submitter_email = Some("ops".into());
        assert!(validate_create(&p).is_err());
    }
}
