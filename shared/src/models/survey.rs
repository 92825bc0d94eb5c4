//! Survey Model (问卷)

use serde::{Deserialize, Serialize};

use super::question::{Question, QuestionCreate, QuestionEdit};
use crate::error::{AppError, AppResult, ErrorCode};

/// Survey lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SurveyStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl SurveyStatus {
    /// 状态流转规则
    ///
    /// | From | To |
    /// |------|----|
    /// | DRAFT | ACTIVE, ARCHIVED |
    /// | ACTIVE | ARCHIVED |
    /// | ARCHIVED | ACTIVE |
    ///
    /// 同状态视为幂等，允许。已发布的问卷不能回到 DRAFT。
    pub fn can_transition_to(self, next: SurveyStatus) -> bool {
        use SurveyStatus::*;
        self == next
            || matches!(
                (self, next),
                (Draft, Active) | (Draft, Archived) | (Active, Archived) | (Archived, Active)
            )
    }

    /// Only active surveys accept responses
    pub fn accepts_responses(self) -> bool {
        self == SurveyStatus::Active
    }
}

/// How the survey reaches respondents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMode {
    #[default]
    Manual,
    Scheduled,
    Triggered,
}

/// Delivery configuration (stored as JSON; no mail transport here)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfig {
    #[serde(default)]
    pub mode: DeliveryMode,
    /// Send time (Unix millis), required for SCHEDULED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<i64>,
    /// Triggering event name, required for TRIGGERED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_event: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

impl DeliveryConfig {
    /// Check mode-specific fields and recipient addresses
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |msg: String| AppError::with_message(ErrorCode::InvalidDeliveryConfig, msg);

        match self.mode {
            DeliveryMode::Manual => {}
            DeliveryMode::Scheduled => {
                if self.scheduled_at.is_none() {
                    return Err(invalid("Scheduled delivery requires scheduledAt".into()));
                }
            }
            DeliveryMode::Triggered => {
                if self
                    .trigger_event
                    .as_deref()
                    .is_none_or(|e| e.trim().is_empty())
                {
                    return Err(invalid("Triggered delivery requires triggerEvent".into()));
                }
            }
        }

        if let Some(bad) = self.recipients.iter().find(|r| !looks_like_email(r)) {
            return Err(invalid(format!("Invalid recipient address: {}", bad))
                .with_detail("recipient", bad.clone()));
        }
        Ok(())
    }
}

/// Loose address shape check: non-empty, contains `@` and `.`
pub fn looks_like_email(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v.contains('@') && v.contains('.')
}

/// Survey entity (owns its ordered questions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub category: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub delivery: DeliveryConfig,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Survey {
    pub fn question(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// Survey list item (no questions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SurveySummary {
    pub id: i64,
    pub title: String,
    pub status: SurveyStatus,
    pub category: Option<String>,
    pub question_count: i64,
    pub response_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create survey payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyCreate {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub delivery: Option<DeliveryConfig>,
    #[serde(default)]
    pub questions: Vec<QuestionCreate>,
}

/// Update survey payload (all optional)
///
/// `questions`, when present, is the complete new question list in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub delivery: Option<DeliveryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionEdit>>,
}

/// Change survey status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyStatusUpdate {
    pub status: SurveyStatus,
}
