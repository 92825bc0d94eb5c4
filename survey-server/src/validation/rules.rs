//! Per-type answer rules

use chrono::NaiveDate;
use shared::models::{AnswerValue, QuestionSettings, QuestionType, SCORE_CEILING, SCORE_FLOOR};

/// Parse a trimmed integer score
pub fn parse_score(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn single(value: &AnswerValue) -> Option<&str> {
    value.as_single().filter(|s| !s.is_empty())
}

fn is_email(s: &str) -> bool {
    s.contains('@') && s.contains('.')
}

fn score_in(value: &AnswerValue, lo: i64, hi: i64) -> bool {
    single(value)
        .and_then(parse_score)
        .is_some_and(|n| n >= lo && n <= hi)
}

/// Is `value` an acceptable answer for a question of `question_type`?
///
/// `settings` supplies rating bounds; absent settings mean the 1..=5 default.
pub fn is_valid_answer(
    question_type: QuestionType,
    value: &AnswerValue,
    settings: Option<&QuestionSettings>,
) -> bool {
    match question_type {
        QuestionType::Text
        | QuestionType::Textarea
        | QuestionType::SingleChoice
        | QuestionType::Dropdown
        | QuestionType::FileUpload => single(value).is_some(),
        QuestionType::Email => single(value).is_some_and(is_email),
        QuestionType::Number => {
            single(value).is_some_and(|s| s.parse::<f64>().is_ok_and(|v| v.is_finite()))
        }
        QuestionType::Date => {
            single(value).is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
        }
        QuestionType::MultipleChoice | QuestionType::Matrix | QuestionType::Ranking => {
            !value.selections().is_empty()
        }
        QuestionType::Rating => {
            let (lo, hi) = settings
                .map(QuestionSettings::rating_bounds)
                .unwrap_or_else(|| QuestionSettings::default().rating_bounds());
            score_in(value, lo, hi)
        }
        QuestionType::Nps => score_in(value, SCORE_FLOOR, SCORE_CEILING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(t: QuestionType, v: impl Into<AnswerValue>) -> bool {
        is_valid_answer(t, &v.into(), None)
    }

    #[test]
    fn test_text_rules() {
        assert!(ok(QuestionType::Text, "hello"));
        assert!(!ok(QuestionType::Text, "   "));
        assert!(ok(QuestionType::Textarea, " multi\nline "));
        assert!(!ok(QuestionType::Text, vec!["a", "b"]));
    }

    #[test]
    fn test_email_rule() {
        assert!(ok(QuestionType::Email, "ana@example.com"));
        assert!(!ok(QuestionType::Email, "ana@example"));
        assert!(!ok(QuestionType::Email, "example.com"));
        assert!(!ok(QuestionType::Email, ""));
    }

    #[test]
    fn test_number_rule() {
        assert!(ok(QuestionType::Number, "42"));
        assert!(ok(QuestionType::Number, " -3.5 "));
        assert!(!ok(QuestionType::Number, "forty-two"));
        assert!(!ok(QuestionType::Number, ""));
        assert!(!ok(QuestionType::Number, "NaN"));
        assert!(!ok(QuestionType::Number, "inf"));
        assert!(!ok(QuestionType::Number, "-infinity"));
    }

    #[test]
    fn test_choice_rules() {
        assert!(ok(QuestionType::SingleChoice, "A"));
        assert!(ok(QuestionType::Dropdown, "Madrid"));
        assert!(!ok(QuestionType::Dropdown, ""));

        assert!(ok(QuestionType::MultipleChoice, vec!["A", "B"]));
        assert!(ok(QuestionType::MultipleChoice, "A"));
        assert!(!ok(QuestionType::MultipleChoice, vec!["", " "]));
        assert!(!ok(QuestionType::MultipleChoice, AnswerValue::Multi(vec![])));
    }

    #[test]
    fn test_rating_default_bounds() {
        assert!(ok(QuestionType::Rating, "1"));
        assert!(ok(QuestionType::Rating, "5"));
        assert!(!ok(QuestionType::Rating, "0"));
        assert!(!ok(QuestionType::Rating, "6"));
        assert!(!ok(QuestionType::Rating, "4.5"));
        assert!(!ok(QuestionType::Rating, "great"));
    }

    #[test]
    fn test_rating_custom_bounds_are_clamped() {
        let settings = QuestionSettings {
            min: Some(0),
            max: Some(15),
            ..Default::default()
        };
        let check = |v: &str| is_valid_answer(QuestionType::Rating, &v.into(), Some(&settings));
        assert!(check("0"));
        assert!(check("10"));
        assert!(!check("11"));
    }

    #[test]
    fn test_nps_rule() {
        assert!(ok(QuestionType::Nps, "0"));
        assert!(ok(QuestionType::Nps, "10"));
        assert!(!ok(QuestionType::Nps, "11"));
        assert!(!ok(QuestionType::Nps, "-1"));
    }

    #[test]
    fn test_extended_types() {
        assert!(ok(QuestionType::Date, "2024-02-29"));
        assert!(!ok(QuestionType::Date, "2023-02-29"));
        assert!(ok(QuestionType::Matrix, vec!["row1:3"]));
        assert!(ok(QuestionType::Ranking, vec!["B", "A", "C"]));
        assert!(!ok(QuestionType::Ranking, AnswerValue::Multi(vec![])));
        assert!(ok(QuestionType::FileUpload, "uploads/cv.pdf"));
        assert!(!ok(QuestionType::FileUpload, " "));
    }
}
