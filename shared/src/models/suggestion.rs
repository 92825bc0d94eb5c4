//! Suggestion Model (建议 / 需求反馈)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SuggestionKind {
    #[default]
    Suggestion,
    FeatureRequirement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Review workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SuggestionStatus {
    #[default]
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Implemented,
}

impl SuggestionStatus {
    /// SUBMITTED → UNDER_REVIEW → APPROVED | REJECTED, APPROVED → IMPLEMENTED
    pub fn can_transition_to(self, next: SuggestionStatus) -> bool {
        use SuggestionStatus::*;
        matches!(
            (self, next),
            (Submitted, UnderReview)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Implemented)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SuggestionStatus::Rejected | SuggestionStatus::Implemented)
    }
}

/// Suggestion entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Suggestion {
    pub id: i64,
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
    pub priority: Priority,
    pub status: SuggestionStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Submit suggestion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCreate {
    #[serde(default)]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
    pub priority: Option<Priority>,
}

/// Workflow transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionStatusUpdate {
    pub status: SuggestionStatus,
}
