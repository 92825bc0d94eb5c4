//! Analytics DTOs (统计结果)
//!
//! Plain data returned by the analytics API. Maps keyed by score or
//! question type serialize as JSON objects with string keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::question::QuestionType;
use super::survey_response::{AnswerValue, Respondent};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Half-open time range `[from, to)` in Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    /// Returns None when `from > to`
    pub fn new(from: i64, to: i64) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// The `days` days ending at `now`
    pub fn last_days(now: i64, days: u32) -> Self {
        Self {
            from: now - i64::from(days) * DAY_MS,
            to: now,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.to - self.from
    }

    /// Window of equal length immediately before this one
    pub fn previous(&self) -> Self {
        Self {
            from: self.from - self.duration_ms(),
            to: self.from,
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.from && ts < self.to
    }
}

/// Net Promoter classification of a 0..=10 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NpsCategory {
    Detractor,
    Passive,
    Promoter,
}

impl NpsCategory {
    pub fn from_score(score: i64) -> Option<Self> {
        match score {
            0..=6 => Some(NpsCategory::Detractor),
            7..=8 => Some(NpsCategory::Passive),
            9..=10 => Some(NpsCategory::Promoter),
            _ => None,
        }
    }
}

/// Completion summary over a response set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total_responses: u64,
    /// Percentage (0..=100)
    pub completion_rate: f64,
    /// Seconds
    pub average_completion_time: f64,
}

/// One row of a per-question answer distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStatistic {
    pub answer: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStatisticDto {
    pub question_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub category: Option<String>,
    /// Denominator of every percentage below
    pub total_answers: u64,
    pub answers: Vec<AnswerStatistic>,
}

/// Daily response count (date in business time zone, `YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub count: u64,
}

/// Ranking entry for the top surveys list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPerformance {
    pub survey_id: i64,
    pub title: String,
    pub response_count: u64,
    pub completion_rate: f64,
    pub average_completion_time: f64,
}

/// Survey (or all-surveys) analytics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDto {
    /// None = all surveys
    pub survey_id: Option<i64>,
    pub survey_title: Option<String>,
    pub window: Option<TimeWindow>,
    pub total_surveys: u64,
    pub active_surveys: u64,
    pub total_responses: u64,
    pub completion_rate: f64,
    pub average_completion_time: f64,
    pub validation_rate: f64,
    /// Response growth vs. the preceding window of equal length
    pub growth_rate: f64,
    pub nps_score: f64,
    pub nps_distribution: BTreeMap<u8, u64>,
    pub rating_distribution: BTreeMap<u8, u64>,
    pub question_type_distribution: BTreeMap<QuestionType, u64>,
    pub average_score_by_category: BTreeMap<String, f64>,
    pub device_distribution: BTreeMap<String, u64>,
    pub browser_distribution: BTreeMap<String, u64>,
    pub location_distribution: BTreeMap<String, u64>,
    pub response_trend: Vec<TrendPoint>,
    pub top_surveys: Vec<SurveyPerformance>,
}

/// Per-answer detail inside a response analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAnalytics {
    pub question_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub value: AnswerValue,
    pub display_value: String,
    pub is_valid: bool,
    /// Numeric score for valid rating / nps answers
    pub score: Option<i64>,
    pub nps_category: Option<NpsCategory>,
}

/// Single response analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponseAnalyticsDto {
    pub response_id: i64,
    pub survey_id: i64,
    pub survey_title: String,
    pub submitted_at: i64,
    pub respondent: Respondent,
    pub total_questions: u64,
    pub answered_questions: u64,
    pub valid_answers: u64,
    pub validity_rate: f64,
    /// Mean of the scored answers (0 when none)
    pub average_score: f64,
    pub completion_time_secs: Option<i64>,
    pub device: Option<String>,
    pub browser: Option<String>,
    pub location: Option<String>,
    pub is_abandoned: bool,
    pub answers: Vec<AnswerAnalytics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_previous_has_equal_length() {
        let window = TimeWindow::last_days(100 * DAY_MS, 30);
        assert_eq!(window.duration_ms(), 30 * DAY_MS);

        let prev = window.previous();
        assert_eq!(prev.to, window.from);
        assert_eq!(prev.duration_ms(), window.duration_ms());
    }

    #[test]
    fn test_window_is_half_open() {
        let window = TimeWindow::new(10, 20).unwrap();
        assert!(window.contains(10));
        assert!(window.contains(19));
        assert!(!window.contains(20));
        assert!(TimeWindow::new(20, 10).is_none());
    }

    #[test]
    fn test_nps_category() {
        assert_eq!(NpsCategory::from_score(0), Some(NpsCategory::Detractor));
        assert_eq!(NpsCategory::from_score(6), Some(NpsCategory::Detractor));
        assert_eq!(NpsCategory::from_score(8), Some(NpsCategory::Passive));
        assert_eq!(NpsCategory::from_score(10), Some(NpsCategory::Promoter));
        assert_eq!(NpsCategory::from_score(11), None);
    }

    #[test]
    fn test_map_keys_serialize_as_strings() {
        let mut dto = AnalyticsDto::default();
        dto.nps_distribution.insert(7, 1);
        dto.question_type_distribution.insert(QuestionType::Nps, 1);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["npsDistribution"]["7"], 1);
        assert_eq!(json["questionTypeDistribution"]["nps"], 1);
    }
}
