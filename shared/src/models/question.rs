//! Question Model (问卷题目)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question type tag
///
/// 封闭枚举：未知的类型标签在构造时即被拒绝 (见 [`QuestionType::from_str`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum QuestionType {
    Text,
    Textarea,
    Email,
    Number,
    SingleChoice,
    MultipleChoice,
    Dropdown,
    Rating,
    Nps,
    Matrix,
    Ranking,
    Date,
    FileUpload,
}

impl QuestionType {
    pub const ALL: [QuestionType; 13] = [
        QuestionType::Text,
        QuestionType::Textarea,
        QuestionType::Email,
        QuestionType::Number,
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::Dropdown,
        QuestionType::Rating,
        QuestionType::Nps,
        QuestionType::Matrix,
        QuestionType::Ranking,
        QuestionType::Date,
        QuestionType::FileUpload,
    ];

    /// Wire tag (same as the serde representation)
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::Email => "email",
            QuestionType::Number => "number",
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Rating => "rating",
            QuestionType::Nps => "nps",
            QuestionType::Matrix => "matrix",
            QuestionType::Ranking => "ranking",
            QuestionType::Date => "date",
            QuestionType::FileUpload => "file-upload",
        }
    }

    /// Answers carry a list of selections rather than one value
    pub const fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Matrix | QuestionType::Ranking
        )
    }

    /// Question must declare at least one option
    pub const fn requires_options(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice
                | QuestionType::MultipleChoice
                | QuestionType::Dropdown
                | QuestionType::Ranking
        )
    }

    /// Answers are numeric scores (rating / NPS)
    pub const fn is_scored(&self) -> bool {
        matches!(self, QuestionType::Rating | QuestionType::Nps)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized question type tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown question type: {0}")]
pub struct UnknownQuestionType(pub String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| UnknownQuestionType(s.to_string()))
    }
}

/// Rating scale defaults (1..=5)
pub const DEFAULT_RATING_MIN: i64 = 1;
pub const DEFAULT_RATING_MAX: i64 = 5;

/// Absolute bounds for any scored answer
pub const SCORE_FLOOR: i64 = 0;
pub const SCORE_CEILING: i64 = 10;

/// Type-specific settings (min/max bounds, scale labels)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_label: Option<String>,
}

impl QuestionSettings {
    /// Inclusive rating bounds, clamped into [0, 10]
    pub fn rating_bounds(&self) -> (i64, i64) {
        let lo = self.min.unwrap_or(DEFAULT_RATING_MIN).max(SCORE_FLOOR);
        let hi = self.max.unwrap_or(DEFAULT_RATING_MAX).min(SCORE_CEILING);
        (lo, hi)
    }
}

/// Question entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: String,
    pub required: bool,
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub options: Vec<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub settings: QuestionSettings,
    /// 统计分组用的分类标签 (仅对 rating/nps 题目参与平均分计算)
    pub category: Option<String>,
    pub position: i32,
}

/// Create question payload
///
/// `question_type` 以字符串接收，由服务端解析为 [`QuestionType`]，
/// 未知标签返回 `UnknownQuestionType` 错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreate {
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub settings: Option<QuestionSettings>,
    pub category: Option<String>,
}

/// Question entry of a survey update
///
/// With `id` the existing question is edited in place (its id is kept);
/// without `id` a new question is added. Existing questions left out of
/// the list are removed. Stored responses keep their own snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub question: QuestionCreate,
}
