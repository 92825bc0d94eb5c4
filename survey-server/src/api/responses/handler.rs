//! Survey Response API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{SurveyResponse, SurveyResponseAnalyticsDto, SurveyResponseSubmit};
use shared::util::now_millis;

use crate::analytics::AnalyticsService;
use crate::core::ServerState;
use crate::db::repository::{survey, survey_response};
use crate::utils::validation::{
    MAX_COMPLETION_SECS, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_email,
    validate_optional_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use crate::validation::validate_submission;

fn validate_envelope(payload: &SurveyResponseSubmit) -> AppResult<()> {
    let r = &payload.respondent;
    validate_optional_text(&r.name, "respondent name", MAX_NAME_LEN)?;
    validate_optional_email(&r.email, "respondent email")?;
    validate_optional_text(&r.phone, "respondent phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&r.company, "respondent company", MAX_NAME_LEN)?;
    validate_optional_text(&payload.client_reference, "client reference", MAX_SHORT_TEXT_LEN)?;

    let m = &payload.metadata;
    validate_optional_text(&m.device, "device", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&m.browser, "browser", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&m.location, "location", MAX_SHORT_TEXT_LEN)?;
    if let Some(secs) = m.completion_time_secs
        && !(0..=MAX_COMPLETION_SECS).contains(&secs)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("completion time must be between 0 and {MAX_COMPLETION_SECS} seconds"),
        )
        .with_detail("completion_time_secs", secs));
    }
    Ok(())
}

/// POST /api/surveys/{id}/responses - 提交答卷 (问卷须为 ACTIVE)
pub async fn submit(
    State(state): State<ServerState>,
    Path(survey_id): Path<i64>,
    Json(payload): Json<SurveyResponseSubmit>,
) -> AppResult<Json<SurveyResponse>> {
    validate_envelope(&payload)?;

    let s = survey::find_by_id(state.pool(), survey_id)
        .await?
        .ok_or_else(|| AppError::survey_not_found(survey_id))?;

    if !s.status.accepts_responses() {
        return Err(AppError::with_message(
            ErrorCode::SurveyNotActive,
            format!("Survey {survey_id} is not accepting responses"),
        )
        .with_detail("status", format!("{:?}", s.status)));
    }

    let response = validate_submission(&s, payload, now_millis())?;
    let saved = survey_response::create(state.pool(), &response).await?;

    tracing::info!(
        survey_id,
        response_id = saved.id,
        answers = saved.answers.len(),
        valid = saved.valid_answer_count(),
        "Survey response submitted"
    );
    Ok(Json(saved))
}

/// GET /api/surveys/{id}/responses - 问卷下所有答卷
pub async fn list_by_survey(
    State(state): State<ServerState>,
    Path(survey_id): Path<i64>,
) -> AppResult<Json<Vec<SurveyResponse>>> {
    survey::find_by_id(state.pool(), survey_id)
        .await?
        .ok_or_else(|| AppError::survey_not_found(survey_id))?;
    let responses = survey_response::find_by_survey(state.pool(), survey_id, None).await?;
    Ok(Json(responses))
}

/// GET /api/responses/{id} - 答卷详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SurveyResponse>> {
    let response = survey_response::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::response_not_found(id))?;
    Ok(Json(response))
}

/// GET /api/responses/{id}/analytics - 单份答卷分析
pub async fn analytics(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SurveyResponseAnalyticsDto>> {
    let dto = AnalyticsService::from_state(&state)
        .response_analytics(id)
        .await?;
    Ok(Json(dto))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Respondent, ResponseMetadata};

    #[test]
    fn test_envelope_accepts_empty_submission() {
        assert!(validate_envelope(&SurveyResponseSubmit::default()).is_ok());
    }

    #[test]
    fn test_envelope_rejects_bad_email() {
        let payload = SurveyResponseSubmit {
            respondent: Respondent {
                email: Some("not-an-email".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            validate_envelope(&payload).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_envelope_rejects_negative_completion_time() {
        let payload = SurveyResponseSubmit {
            metadata: ResponseMetadata {
                completion_time_secs: Some(-5),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            validate_envelope(&payload).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_envelope_bounds_completion_time() {
        let with_secs = |secs| SurveyResponseSubmit {
            metadata: ResponseMetadata {
                completion_time_secs: Some(secs),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_envelope(&with_secs(MAX_COMPLETION_SECS)).is_ok());
        assert_eq!(
            validate_envelope(&with_secs(i64::MAX)).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}
