//! Survey API Handlers

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{
    QuestionCreate, QuestionType, Survey, SurveyCreate, SurveyStatus, SurveyStatusUpdate,
    SurveySummary, SurveyUpdate,
};

use crate::core::ServerState;
use crate::db::repository::survey;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_OPTIONS, MAX_SHORT_TEXT_LEN, MAX_TITLE_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<SurveyStatus>,
}

fn validate_question(index: usize, q: &QuestionCreate) -> AppResult<QuestionType> {
    let question_type = q.question_type.parse::<QuestionType>().map_err(|e| {
        AppError::with_message(ErrorCode::UnknownQuestionType, e.to_string())
            .with_detail("index", index)
            .with_detail("type", q.question_type.clone())
    })?;

    validate_required_text(&q.title, "question title", MAX_TITLE_LEN)?;
    validate_optional_text(&q.category, "question category", MAX_SHORT_TEXT_LEN)?;

    let invalid_options =
        |msg: String| AppError::with_message(ErrorCode::InvalidQuestionOptions, msg).with_detail("index", index);

    let options = q.options.as_deref().unwrap_or_default();
    if question_type.requires_options() && options.is_empty() {
        return Err(invalid_options(format!(
            "Question '{}' ({}) needs at least one option",
            q.title, question_type
        )));
    }
    if options.len() > MAX_OPTIONS {
        return Err(invalid_options(format!(
            "Question '{}' has too many options (max {MAX_OPTIONS})",
            q.title
        )));
    }
    if let Some(bad) = options
        .iter()
        .find(|o| o.trim().is_empty() || o.len() > MAX_SHORT_TEXT_LEN)
    {
        return Err(invalid_options(format!(
            "Question '{}' has an invalid option: '{}'",
            q.title, bad
        )));
    }

    if let Some(settings) = &q.settings
        && let (Some(min), Some(max)) = (settings.min, settings.max)
        && min > max
    {
        return Err(invalid_options(format!(
            "Question '{}' has min {} greater than max {}",
            q.title, min, max
        )));
    }

    Ok(question_type)
}

/// Validate a create payload; returns the parsed question types in order
pub fn validate_survey_create(payload: &SurveyCreate) -> AppResult<Vec<QuestionType>> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if let Some(delivery) = &payload.delivery {
        delivery.validate()?;
    }
    payload
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| validate_question(i, q))
        .collect()
}

/// Validate an update payload against the survey it edits
pub fn validate_survey_update(current: &Survey, payload: &SurveyUpdate) -> AppResult<()> {
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_TITLE_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if let Some(delivery) = &payload.delivery {
        delivery.validate()?;
    }

    let Some(questions) = &payload.questions else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    for (index, edit) in questions.iter().enumerate() {
        validate_question(index, &edit.question)?;
        let Some(question_id) = edit.id else {
            continue;
        };
        if current.question(question_id).is_none() {
            return Err(AppError::with_message(
                ErrorCode::QuestionNotFound,
                format!("Question {question_id} does not belong to survey {}", current.id),
            )
            .with_detail("question_id", question_id));
        }
        if !seen.insert(question_id) {
            return Err(AppError::validation(format!(
                "Question {question_id} is listed more than once"
            ))
            .with_detail("question_id", question_id));
        }
    }

    if questions.is_empty() && current.status == SurveyStatus::Active {
        return Err(AppError::with_message(
            ErrorCode::SurveyHasNoQuestions,
            format!("Active survey {} must keep at least one question", current.id),
        ));
    }
    Ok(())
}

/// GET /api/surveys - 问卷列表 (可按状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SurveySummary>>> {
    let surveys = survey::find_all(state.pool(), query.status).await?;
    Ok(Json(surveys))
}

/// GET /api/surveys/{id} - 问卷详情 (含题目)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Survey>> {
    let s = survey::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::survey_not_found(id))?;
    Ok(Json(s))
}

/// POST /api/surveys - 创建问卷 (初始状态 DRAFT)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SurveyCreate>,
) -> AppResult<Json<Survey>> {
    validate_survey_create(&payload)?;
    let s = survey::create(state.pool(), payload).await?;
    tracing::info!(survey_id = s.id, questions = s.questions.len(), "Survey created");
    Ok(Json(s))
}

/// PUT /api/surveys/{id} - 更新问卷 (可整体替换题目列表)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SurveyUpdate>,
) -> AppResult<Json<Survey>> {
    let current = survey::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::survey_not_found(id))?;

    validate_survey_update(&current, &payload)?;

    let s = survey::update(state.pool(), id, payload).await?;
    tracing::info!(
        survey_id = id,
        questions = s.questions.len(),
        "Survey updated"
    );
    Ok(Json(s))
}

/// PUT /api/surveys/{id}/status - 状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SurveyStatusUpdate>,
) -> AppResult<Json<Survey>> {
    let current = survey::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::survey_not_found(id))?;

    if !current.status.can_transition_to(payload.status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidSurveyTransition,
            format!(
                "Cannot change survey status from {:?} to {:?}",
                current.status, payload.status
            ),
        )
        .with_detail("survey_id", id));
    }

    if payload.status == SurveyStatus::Active && current.questions.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::SurveyHasNoQuestions,
            format!("Survey {id} has no questions and cannot be activated"),
        ));
    }

    if current.status == payload.status {
        return Ok(Json(current));
    }

    let s = survey::update_status(state.pool(), id, payload.status).await?;
    tracing::info!(
        survey_id = id,
        from = ?current.status,
        to = ?s.status,
        "Survey status changed"
    );
    Ok(Json(s))
}

/// DELETE /api/surveys/{id} - 删除问卷 (题目与答卷级联删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = survey::delete(state.pool(), id).await?;
    if !deleted {
        return Err(AppError::survey_not_found(id));
    }
    tracing::info!(survey_id = id, "Survey deleted");
    Ok(Json(true))
}
