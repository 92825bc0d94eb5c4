//! Survey Response Model (问卷答卷)

use serde::{Deserialize, Serialize};

use super::question::{Question, QuestionType};

/// Raw answer value
///
/// JSON 形式: 单值为字符串，多值 (多选/矩阵/排序) 为字符串数组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    /// Trimmed single value (None for `Multi`)
    pub fn as_single(&self) -> Option<&str> {
        match self {
            AnswerValue::Single(s) => Some(s.trim()),
            AnswerValue::Multi(_) => None,
        }
    }

    /// Non-empty trimmed selections, each distinct option once
    ///
    /// `Single` 视为一个选项
    pub fn selections(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            AnswerValue::Single(s) => vec![s.trim()],
            AnswerValue::Multi(items) => items.iter().map(|s| s.trim()).collect(),
        };
        let mut out: Vec<&str> = Vec::with_capacity(raw.len());
        for item in raw {
            if !item.is_empty() && !out.contains(&item) {
                out.push(item);
            }
        }
        out
    }

    /// No usable content at all
    pub fn is_blank(&self) -> bool {
        self.selections().is_empty()
    }

    /// Human-readable form (multi values joined with ", ")
    pub fn display_text(&self) -> String {
        match self {
            AnswerValue::Single(s) => s.trim().to_string(),
            AnswerValue::Multi(_) => self.selections().join(", "),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Single(s.to_string())
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        AnswerValue::Multi(items.into_iter().map(String::from).collect())
    }
}

/// Point-in-time copy of the answered question
///
/// 统计只读取快照，不再回查题目定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSnapshot {
    pub question_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

impl QuestionSnapshot {
    pub fn of(question: &Question) -> Self {
        Self {
            question_id: question.id,
            title: question.title.clone(),
            question_type: question.question_type,
        }
    }
}

/// One answer inside a survey response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question: QuestionSnapshot,
    pub value: AnswerValue,
    #[serde(default)]
    pub is_valid: bool,
}

impl QuestionResponse {
    pub fn new(question: QuestionSnapshot, value: AnswerValue) -> Self {
        Self {
            question,
            value,
            is_valid: false,
        }
    }

    pub fn question_id(&self) -> i64 {
        self.question.question_id
    }

    pub fn question_type(&self) -> QuestionType {
        self.question.question_type
    }
}

/// Respondent contact details (all optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Respondent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Client-side analytics metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub is_abandoned: bool,
}

/// Survey response (答卷)
///
/// 创建后只读；`is_valid` 仅在校验阶段 (持久化之前) 被改写
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: i64,
    pub survey_id: i64,
    #[serde(default)]
    pub respondent: Respondent,
    pub submitted_at: i64,
    #[serde(default)]
    pub answers: Vec<QuestionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
    #[serde(default)]
    pub metadata: ResponseMetadata,
}

impl SurveyResponse {
    pub fn valid_answer_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_valid).count()
    }

    /// Valid answers / all answers * 100 (0 when no answers)
    pub fn validity_rate(&self) -> f64 {
        if self.answers.is_empty() {
            return 0.0;
        }
        self.valid_answer_count() as f64 / self.answers.len() as f64 * 100.0
    }

    /// First answer for the given question
    pub fn answer_for(&self, question_id: i64) -> Option<&QuestionResponse> {
        self.answers.iter().find(|a| a.question_id() == question_id)
    }
}

/// One answer in a submission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmit {
    pub question_id: i64,
    pub value: AnswerValue,
}

/// Submit response payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponseSubmit {
    #[serde(default)]
    pub respondent: Respondent,
    #[serde(default)]
    pub answers: Vec<AnswerSubmit>,
    pub client_id: Option<i64>,
    pub client_reference: Option<String>,
    #[serde(default)]
    pub metadata: ResponseMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i64, question_type: QuestionType) -> QuestionSnapshot {
        QuestionSnapshot {
            question_id: id,
            title: format!("Q{}", id),
            question_type,
        }
    }

    #[test]
    fn test_answer_value_json_shape() {
        let single: AnswerValue = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(single, AnswerValue::Single("Yes".into()));

        let multi: AnswerValue = serde_json::from_str("[\"A\",\"B\"]").unwrap();
        assert_eq!(multi, AnswerValue::from(vec!["A", "B"]));

        assert_eq!(serde_json::to_string(&multi).unwrap(), "[\"A\",\"B\"]");
    }

    #[test]
    fn test_selections_trim_and_dedupe() {
        let value = AnswerValue::from(vec![" A ", "B", "", "A", "  "]);
        assert_eq!(value.selections(), vec!["A", "B"]);
        assert_eq!(value.display_text(), "A, B");

        assert_eq!(AnswerValue::from("  x ").selections(), vec!["x"]);
        assert!(AnswerValue::from("   ").is_blank());
        assert!(AnswerValue::Multi(vec![]).is_blank());
    }

    #[test]
    fn test_as_single() {
        assert_eq!(AnswerValue::from(" 7 ").as_single(), Some("7"));
        assert_eq!(AnswerValue::from(vec!["7"]).as_single(), None);
    }

    #[test]
    fn test_validity_rate() {
        let mut response = SurveyResponse {
            id: 1,
            survey_id: 10,
            respondent: Respondent::default(),
            submitted_at: 0,
            answers: vec![
                QuestionResponse::new(snapshot(1, QuestionType::Text), "a".into()),
                QuestionResponse::new(snapshot(2, QuestionType::Text), "b".into()),
                QuestionResponse::new(snapshot(3, QuestionType::Text), "".into()),
                QuestionResponse::new(snapshot(4, QuestionType::Text), "c".into()),
            ],
            client_id: None,
            client_reference: None,
            metadata: ResponseMetadata::default(),
        };
        assert_eq!(response.validity_rate(), 0.0);

        for answer in response.answers.iter_mut().take(3) {
            answer.is_valid = true;
        }
        assert_eq!(response.valid_answer_count(), 3);
        assert!((response.validity_rate() - 75.0).abs() < 1e-9);

        response.answers.clear();
        assert_eq!(response.validity_rate(), 0.0);
    }

    #[test]
    fn test_answer_for() {
        let response = SurveyResponse {
            id: 1,
            survey_id: 10,
            respondent: Respondent::default(),
            submitted_at: 0,
            answers: vec![QuestionResponse::new(
                snapshot(5, QuestionType::Nps),
                "9".into(),
            )],
            client_id: None,
            client_reference: None,
            metadata: ResponseMetadata::default(),
        };
        assert_eq!(response.answer_for(5).unwrap().question_type(), QuestionType::Nps);
        assert!(response.answer_for(6).is_none());
    }
}
