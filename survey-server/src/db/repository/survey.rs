//! Survey Repository (问卷 + 题目)

use std::collections::{HashMap, HashSet};

use super::{RepoError, RepoResult};
use shared::models::{
    Question, QuestionCreate, QuestionType, Survey, SurveyCreate, SurveyStatus, SurveySummary,
    SurveyUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SURVEY_COLUMNS: &str =
    "id, title, description, status, category, delivery, created_at, updated_at";

const QUESTION_COLUMNS: &str =
    "id, survey_id, question_type, title, required, options, settings, category, position";

fn to_json<T: serde::Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|e| RepoError::Validation(e.to_string()))
}

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<SurveyStatus>,
) -> RepoResult<Vec<SurveySummary>> {
    let surveys = sqlx::query_as::<_, SurveySummary>(
        "SELECT s.id, s.title, s.status, s.category, \
         (SELECT COUNT(*) FROM question q WHERE q.survey_id = s.id) AS question_count, \
         (SELECT COUNT(*) FROM survey_response r WHERE r.survey_id = s.id) AS response_count, \
         s.created_at, s.updated_at \
         FROM survey s WHERE (?1 IS NULL OR s.status = ?1) \
         ORDER BY s.created_at DESC, s.id DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(surveys)
}

/// All surveys with their questions (for cross-survey analytics)
pub async fn find_all_with_questions(pool: &SqlitePool) -> RepoResult<Vec<Survey>> {
    let mut surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM survey ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM question ORDER BY survey_id, position"
    ))
    .fetch_all(pool)
    .await?;

    let mut by_survey: HashMap<i64, Vec<Question>> = HashMap::new();
    for q in questions {
        by_survey.entry(q.survey_id).or_default().push(q);
    }
    for survey in &mut surveys {
        survey.questions = by_survey.remove(&survey.id).unwrap_or_default();
    }
    Ok(surveys)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Survey>> {
    let survey = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM survey WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(mut survey) = survey else {
        return Ok(None);
    };
    survey.questions = find_questions(pool, id).await?;
    Ok(Some(survey))
}

pub async fn find_questions(pool: &SqlitePool, survey_id: i64) -> RepoResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM question WHERE survey_id = ? ORDER BY position"
    ))
    .bind(survey_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// (total, active)
pub async fn count_by_status(pool: &SqlitePool) -> RepoResult<(i64, i64)> {
    let row: (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'ACTIVE' THEN 1 ELSE 0 END), 0) FROM survey",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

fn parse_question_type(q: &QuestionCreate) -> RepoResult<QuestionType> {
    q.question_type
        .parse::<QuestionType>()
        .map_err(|e| RepoError::Validation(e.to_string()))
}

/// Insert survey + ordered questions in one transaction (status starts as DRAFT)
pub async fn create(pool: &SqlitePool, data: SurveyCreate) -> RepoResult<Survey> {
    let id = snowflake_id();
    let now = now_millis();
    let delivery = to_json(&data.delivery.unwrap_or_default())?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO survey (id, title, description, status, category, delivery, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(SurveyStatus::Draft)
    .bind(&data.category)
    .bind(delivery)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (position, q) in data.questions.iter().enumerate() {
        let question_type = parse_question_type(q)?;
        sqlx::query(
            "INSERT INTO question (id, survey_id, question_type, title, required, options, settings, category, position) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(id)
        .bind(question_type)
        .bind(q.title.trim())
        .bind(q.required.unwrap_or(false))
        .bind(to_json(&q.options.clone().unwrap_or_default())?)
        .bind(to_json(&q.settings.clone().unwrap_or_default())?)
        .bind(&q.category)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create survey".into()))
}

/// Update survey fields and, when given, its question list in one transaction
///
/// Edited questions keep their ids; questions missing from the list are
/// deleted. Answers already stored are untouched (they carry snapshots).
pub async fn update(pool: &SqlitePool, id: i64, data: SurveyUpdate) -> RepoResult<Survey> {
    let delivery = data.delivery.as_ref().map(to_json).transpose()?;

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE survey SET title = COALESCE(?1, title), description = COALESCE(?2, description), \
         category = COALESCE(?3, category), delivery = COALESCE(?4, delivery), updated_at = ?5 \
         WHERE id = ?6",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.category)
    .bind(delivery)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Survey {id} not found")));
    }

    if let Some(questions) = &data.questions {
        let existing: Vec<i64> = sqlx::query_scalar("SELECT id FROM question WHERE survey_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        let kept: HashSet<i64> = questions.iter().filter_map(|q| q.id).collect();

        for stale in existing.into_iter().filter(|q| !kept.contains(q)) {
            sqlx::query("DELETE FROM question WHERE id = ?")
                .bind(stale)
                .execute(&mut *tx)
                .await?;
        }

        for (position, edit) in questions.iter().enumerate() {
            let q = &edit.question;
            let question_type = parse_question_type(q)?;
            let options = to_json(&q.options.clone().unwrap_or_default())?;
            let settings = to_json(&q.settings.clone().unwrap_or_default())?;

            match edit.id {
                Some(question_id) => {
                    let rows = sqlx::query(
                        "UPDATE question SET question_type = ?, title = ?, required = ?, options = ?, \
                         settings = ?, category = ?, position = ? WHERE id = ? AND survey_id = ?",
                    )
                    .bind(question_type)
                    .bind(q.title.trim())
                    .bind(q.required.unwrap_or(false))
                    .bind(options)
                    .bind(settings)
                    .bind(&q.category)
                    .bind(position as i32)
                    .bind(question_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                    if rows.rows_affected() == 0 {
                        return Err(RepoError::NotFound(format!(
                            "Question {question_id} not found in survey {id}"
                        )));
                    }
                }
                None => {
                    sqlx::query(
                        "INSERT INTO question (id, survey_id, question_type, title, required, options, settings, category, position) \
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    )
                    .bind(snowflake_id())
                    .bind(id)
                    .bind(question_type)
                    .bind(q.title.trim())
                    .bind(q.required.unwrap_or(false))
                    .bind(options)
                    .bind(settings)
                    .bind(&q.category)
                    .bind(position as i32)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Survey {id} not found")))
}

/// Write the new status; transition rules are checked by the caller
pub async fn update_status(pool: &SqlitePool, id: i64, status: SurveyStatus) -> RepoResult<Survey> {
    let rows = sqlx::query("UPDATE survey SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Survey {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Survey {id} not found")))
}

/// Delete survey; questions and responses cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM survey WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
