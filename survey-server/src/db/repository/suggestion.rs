//! Suggestion Repository

use super::{RepoError, RepoResult};
use shared::models::{Suggestion, SuggestionCreate, SuggestionStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, kind, title, description, submitter_name, submitter_email, priority, \
     status, created_at, updated_at";

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<SuggestionStatus>,
) -> RepoResult<Vec<Suggestion>> {
    let suggestions = sqlx::query_as::<_, Suggestion>(&format!(
        "SELECT {COLUMNS} FROM suggestion WHERE (?1 IS NULL OR status = ?1) \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(suggestions)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Suggestion>> {
    let suggestion =
        sqlx::query_as::<_, Suggestion>(&format!("SELECT {COLUMNS} FROM suggestion WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(suggestion)
}

/// New suggestions always start as SUBMITTED
pub async fn create(pool: &SqlitePool, data: SuggestionCreate) -> RepoResult<Suggestion> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(&format!(
        "INSERT INTO suggestion ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(id)
    .bind(data.kind)
    .bind(data.title.trim())
    .bind(data.description.trim())
    .bind(&data.submitter_name)
    .bind(&data.submitter_email)
    .bind(data.priority.unwrap_or_default())
    .bind(SuggestionStatus::Submitted)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create suggestion".into()))
}

/// Compare-and-set status update; fails when the row moved meanwhile
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    from: SuggestionStatus,
    to: SuggestionStatus,
) -> RepoResult<Suggestion> {
    let rows = sqlx::query(
        "UPDATE suggestion SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(to)
    .bind(now_millis())
    .bind(id)
    .bind(from)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Validation(format!(
            "Suggestion {id} is no longer {from:?}"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Suggestion {id} not found")))
}
