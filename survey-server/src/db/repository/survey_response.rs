//! Survey Response Repository (答卷)
//!
//! Response header in `survey_response`, answers (with their question
//! snapshot) in `question_response`.

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{
    AnswerValue, QuestionResponse, QuestionSnapshot, QuestionType, Respondent, ResponseMetadata,
    SurveyResponse, TimeWindow,
};
use sqlx::SqlitePool;

const RESPONSE_COLUMNS: &str = "id, survey_id, respondent_name, respondent_email, respondent_phone, \
     respondent_company, submitted_at, client_id, client_reference, completion_time_secs, \
     device, browser, location, is_abandoned";

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: i64,
    survey_id: i64,
    respondent_name: Option<String>,
    respondent_email: Option<String>,
    respondent_phone: Option<String>,
    respondent_company: Option<String>,
    submitted_at: i64,
    client_id: Option<i64>,
    client_reference: Option<String>,
    completion_time_secs: Option<i64>,
    device: Option<String>,
    browser: Option<String>,
    location: Option<String>,
    is_abandoned: bool,
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    response_id: i64,
    question_id: i64,
    question_title: String,
    question_type: QuestionType,
    #[sqlx(json)]
    value: AnswerValue,
    is_valid: bool,
}

impl ResponseRow {
    fn into_response(self, answers: Vec<QuestionResponse>) -> SurveyResponse {
        SurveyResponse {
            id: self.id,
            survey_id: self.survey_id,
            respondent: Respondent {
                name: self.respondent_name,
                email: self.respondent_email,
                phone: self.respondent_phone,
                company: self.respondent_company,
            },
            submitted_at: self.submitted_at,
            answers,
            client_id: self.client_id,
            client_reference: self.client_reference,
            metadata: ResponseMetadata {
                completion_time_secs: self.completion_time_secs,
                device: self.device,
                browser: self.browser,
                location: self.location,
                is_abandoned: self.is_abandoned,
            },
        }
    }
}

impl From<AnswerRow> for QuestionResponse {
    fn from(row: AnswerRow) -> Self {
        QuestionResponse {
            question: QuestionSnapshot {
                question_id: row.question_id,
                title: row.question_title,
                question_type: row.question_type,
            },
            value: row.value,
            is_valid: row.is_valid,
        }
    }
}

/// Bound parameters per `IN (...)` batch (below SQLite's variable limit)
const HYDRATE_BATCH: usize = 500;

/// Attach answers to response rows, one answer query per batch
async fn hydrate(pool: &SqlitePool, rows: Vec<ResponseRow>) -> RepoResult<Vec<SurveyResponse>> {
    let mut by_response: HashMap<i64, Vec<QuestionResponse>> = HashMap::new();

    for chunk in rows.chunks(HYDRATE_BATCH) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT response_id, question_id, question_title, question_type, value, is_valid \
             FROM question_response WHERE response_id IN ({placeholders}) \
             ORDER BY response_id, position"
        );
        let mut query = sqlx::query_as::<_, AnswerRow>(&sql);
        for row in chunk {
            query = query.bind(row.id);
        }
        for a in query.fetch_all(pool).await? {
            by_response.entry(a.response_id).or_default().push(a.into());
        }
    }

    Ok(rows
        .into_iter()
        .map(|r| {
            let answers = by_response.remove(&r.id).unwrap_or_default();
            r.into_response(answers)
        })
        .collect())
}

/// Responses of one survey, oldest first
pub async fn find_by_survey(
    pool: &SqlitePool,
    survey_id: i64,
    window: Option<TimeWindow>,
) -> RepoResult<Vec<SurveyResponse>> {
    let (from, to) = window.map_or((i64::MIN, i64::MAX), |w| (w.from, w.to));
    let rows = sqlx::query_as::<_, ResponseRow>(&format!(
        "SELECT {RESPONSE_COLUMNS} FROM survey_response \
         WHERE survey_id = ? AND submitted_at >= ? AND submitted_at < ? \
         ORDER BY submitted_at, id"
    ))
    .bind(survey_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    hydrate(pool, rows).await
}

/// Responses across all surveys, oldest first
pub async fn find_all(
    pool: &SqlitePool,
    window: Option<TimeWindow>,
) -> RepoResult<Vec<SurveyResponse>> {
    let (from, to) = window.map_or((i64::MIN, i64::MAX), |w| (w.from, w.to));
    let rows = sqlx::query_as::<_, ResponseRow>(&format!(
        "SELECT {RESPONSE_COLUMNS} FROM survey_response \
         WHERE submitted_at >= ? AND submitted_at < ? \
         ORDER BY submitted_at, id"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    hydrate(pool, rows).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<SurveyResponse>> {
    let row = sqlx::query_as::<_, ResponseRow>(&format!(
        "SELECT {RESPONSE_COLUMNS} FROM survey_response WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(hydrate(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

pub async fn count_by_survey(pool: &SqlitePool, survey_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM survey_response WHERE survey_id = ?")
        .bind(survey_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Responses submitted inside the window (optionally one survey)
pub async fn count_in_window(
    pool: &SqlitePool,
    survey_id: Option<i64>,
    window: TimeWindow,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM survey_response \
         WHERE (?1 IS NULL OR survey_id = ?1) AND submitted_at >= ?2 AND submitted_at < ?3",
    )
    .bind(survey_id)
    .bind(window.from)
    .bind(window.to)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Persist a validated response (header + answers) atomically
pub async fn create(pool: &SqlitePool, response: &SurveyResponse) -> RepoResult<SurveyResponse> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        "INSERT INTO survey_response ({RESPONSE_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(response.id)
    .bind(response.survey_id)
    .bind(&response.respondent.name)
    .bind(&response.respondent.email)
    .bind(&response.respondent.phone)
    .bind(&response.respondent.company)
    .bind(response.submitted_at)
    .bind(response.client_id)
    .bind(&response.client_reference)
    .bind(response.metadata.completion_time_secs)
    .bind(&response.metadata.device)
    .bind(&response.metadata.browser)
    .bind(&response.metadata.location)
    .bind(response.metadata.is_abandoned)
    .execute(&mut *tx)
    .await?;

    for (position, answer) in response.answers.iter().enumerate() {
        let value = serde_json::to_string(&answer.value)
            .map_err(|e| RepoError::Validation(e.to_string()))?;
        sqlx::query(
            "INSERT INTO question_response \
             (response_id, position, question_id, question_title, question_type, value, is_valid) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(response.id)
        .bind(position as i64)
        .bind(answer.question.question_id)
        .bind(&answer.question.title)
        .bind(answer.question.question_type)
        .bind(value)
        .bind(answer.is_valid)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, response.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create survey response".into()))
}
