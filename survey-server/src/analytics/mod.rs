//! Statistics / Analytics Service
//!
//! Loads surveys and responses from the stores, runs the aggregation
//! engine and shapes the DTOs. Existence checks (not-found) live here;
//! store failures propagate unchanged.

pub mod compose;

use chrono_tz::Tz;
use sqlx::SqlitePool;

use shared::models::{
    AnalyticsDto, AnswerAnalytics, NpsCategory, QuestionStatisticDto, QuestionType, Survey,
    SurveyResponse, SurveyResponseAnalyticsDto, SurveyStatus, TimeWindow,
};
use shared::util::now_millis;

use crate::aggregation::{self, answer_score};
use crate::core::ServerState;
use crate::db::repository::{survey, survey_response};
use crate::utils::{AppError, AppResult};

pub use compose::{growth_rate, response_trend, top_surveys};

/// Analytics entry point bound to a pool and business settings
#[derive(Clone)]
pub struct AnalyticsService {
    pool: SqlitePool,
    timezone: Tz,
    window_days: u32,
    top_limit: usize,
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool, timezone: Tz, window_days: u32, top_limit: usize) -> Self {
        Self {
            pool,
            timezone,
            window_days,
            top_limit,
        }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(
            state.pool().clone(),
            state.config.timezone,
            state.config.analytics_window_days,
            state.config.top_surveys_limit,
        )
    }

    async fn require_survey(&self, survey_id: i64) -> AppResult<Survey> {
        survey::find_by_id(&self.pool, survey_id)
            .await?
            .ok_or_else(|| AppError::survey_not_found(survey_id))
    }

    /// Analytics for one survey (`Some`) or all surveys (`None`)
    ///
    /// A survey without responses yields a zeroed DTO.
    pub async fn survey_analytics(
        &self,
        survey_id: Option<i64>,
        window: Option<TimeWindow>,
    ) -> AppResult<AnalyticsDto> {
        let (surveys, responses) = match survey_id {
            Some(id) => {
                let s = self.require_survey(id).await?;
                let responses = survey_response::find_by_survey(&self.pool, id, window).await?;
                (vec![s], responses)
            }
            None => {
                let surveys = survey::find_all_with_questions(&self.pool).await?;
                let responses = survey_response::find_all(&self.pool, window).await?;
                (surveys, responses)
            }
        };

        let (total_surveys, active_surveys) = match survey_id {
            Some(_) => (
                surveys.len() as u64,
                surveys
                    .iter()
                    .filter(|s| s.status == SurveyStatus::Active)
                    .count() as u64,
            ),
            None => {
                let (total, active) = survey::count_by_status(&self.pool).await?;
                (total as u64, active as u64)
            }
        };

        let growth_window =
            window.unwrap_or_else(|| TimeWindow::last_days(now_millis(), self.window_days));
        let current =
            survey_response::count_in_window(&self.pool, survey_id, growth_window).await?;
        let previous =
            survey_response::count_in_window(&self.pool, survey_id, growth_window.previous())
                .await?;

        let questions: Vec<_> = surveys.iter().flat_map(|s| s.questions.clone()).collect();
        let completion = aggregation::completion_stats(&responses);
        let nps_distribution = aggregation::nps_histogram(&responses);

        let dto = AnalyticsDto {
            survey_id,
            survey_title: survey_id.and_then(|_| surveys.first().map(|s| s.title.clone())),
            window,
            total_surveys,
            active_surveys,
            total_responses: completion.total_responses,
            completion_rate: completion.completion_rate,
            average_completion_time: completion.average_completion_time,
            validation_rate: aggregation::validation_rate(&responses),
            growth_rate: growth_rate(current as u64, previous as u64),
            nps_score: aggregation::nps_score(&nps_distribution),
            nps_distribution,
            rating_distribution: aggregation::rating_histogram(&responses),
            question_type_distribution: aggregation::question_type_distribution(&responses),
            average_score_by_category: aggregation::average_score_by_category(
                &responses, &questions,
            ),
            device_distribution: aggregation::device_distribution(&responses),
            browser_distribution: aggregation::browser_distribution(&responses),
            location_distribution: aggregation::location_distribution(&responses),
            response_trend: response_trend(&responses, window, self.timezone),
            top_surveys: match survey_id {
                Some(_) => Vec::new(),
                None => top_surveys(&surveys, &responses, self.top_limit),
            },
        };

        tracing::debug!(
            survey_id = ?survey_id,
            responses = dto.total_responses,
            "Survey analytics computed"
        );
        Ok(dto)
    }

    /// Per-question answer distributions, in question order
    pub async fn question_statistics(&self, survey_id: i64) -> AppResult<Vec<QuestionStatisticDto>> {
        let s = self.require_survey(survey_id).await?;
        let responses = survey_response::find_by_survey(&self.pool, survey_id, None).await?;

        Ok(s.questions
            .iter()
            .map(|q| {
                let dist = aggregation::answer_distribution(&responses, q.id);
                QuestionStatisticDto {
                    question_id: q.id,
                    title: q.title.clone(),
                    question_type: q.question_type,
                    category: q.category.clone(),
                    total_answers: dist.total(),
                    answers: dist.to_statistics(),
                }
            })
            .collect())
    }

    /// Detail view of one response with per-answer validity and scoring
    pub async fn response_analytics(
        &self,
        response_id: i64,
    ) -> AppResult<SurveyResponseAnalyticsDto> {
        let response = survey_response::find_by_id(&self.pool, response_id)
            .await?
            .ok_or_else(|| AppError::response_not_found(response_id))?;
        let s = self.require_survey(response.survey_id).await?;
        Ok(build_response_analytics(&s, response))
    }
}

/// Shape a single response into its analytics DTO
pub fn build_response_analytics(
    survey: &Survey,
    response: SurveyResponse,
) -> SurveyResponseAnalyticsDto {
    let answers: Vec<AnswerAnalytics> = response
        .answers
        .iter()
        .map(|a| {
            let score = if a.is_valid { answer_score(a) } else { None };
            AnswerAnalytics {
                question_id: a.question_id(),
                title: a.question.title.clone(),
                question_type: a.question_type(),
                value: a.value.clone(),
                display_value: a.value.display_text(),
                is_valid: a.is_valid,
                score,
                nps_category: match a.question_type() {
                    QuestionType::Nps => score.and_then(NpsCategory::from_score),
                    _ => None,
                },
            }
        })
        .collect();

    let scores: Vec<f64> = answers
        .iter()
        .filter_map(|a| a.score)
        .map(|s| s as f64)
        .collect();

    SurveyResponseAnalyticsDto {
        response_id: response.id,
        survey_id: response.survey_id,
        survey_title: survey.title.clone(),
        submitted_at: response.submitted_at,
        total_questions: survey.questions.len() as u64,
        answered_questions: response
            .answers
            .iter()
            .filter(|a| !a.value.is_blank())
            .count() as u64,
        valid_answers: response.valid_answer_count() as u64,
        validity_rate: response.validity_rate(),
        average_score: aggregation::mean(&scores),
        completion_time_secs: response.metadata.completion_time_secs,
        device: response.metadata.device.clone(),
        browser: response.metadata.browser.clone(),
        location: response.metadata.location.clone(),
        is_abandoned: response.metadata.is_abandoned,
        respondent: response.respondent,
        answers,
    }
}
