use std::collections::BTreeMap;

use shared::models::{AnswerStatistic, QuestionType, SurveyResponse};

use super::percentage;

/// Label for absent or blank metadata
pub const UNKNOWN: &str = "Unknown";

/// Answer string → count for one question
///
/// `total` is the number of counted selections (the percentage
/// denominator), not the number of responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerDistribution {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl AnswerDistribution {
    pub fn count(&self, answer: &str) -> u64 {
        self.counts.get(answer).copied().unwrap_or(0)
    }

    pub fn percentage(&self, answer: &str) -> f64 {
        percentage(self.count(answer), self.total)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    /// Rows ordered by count desc, then answer asc
    pub fn to_statistics(&self) -> Vec<AnswerStatistic> {
        let mut rows: Vec<AnswerStatistic> = self
            .counts
            .iter()
            .map(|(answer, &count)| AnswerStatistic {
                answer: answer.clone(),
                count,
                percentage: percentage(count, self.total),
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.answer.cmp(&b.answer)));
        rows
    }
}

/// Count every distinct selected option once per response
pub fn answer_distribution(responses: &[SurveyResponse], question_id: i64) -> AnswerDistribution {
    let mut dist = AnswerDistribution::default();
    for response in responses {
        for answer in response.answers.iter().filter(|a| a.question_id() == question_id) {
            for option in answer.value.selections() {
                *dist.counts.entry(option.to_string()).or_insert(0) += 1;
                dist.total += 1;
            }
        }
    }
    dist
}

/// Number of answers per snapshot question type
pub fn question_type_distribution(responses: &[SurveyResponse]) -> BTreeMap<QuestionType, u64> {
    let mut dist = BTreeMap::new();
    for answer in responses.iter().flat_map(|r| &r.answers) {
        *dist.entry(answer.question_type()).or_insert(0) += 1;
    }
    dist
}

fn metadata_distribution<F>(responses: &[SurveyResponse], field: F) -> BTreeMap<String, u64>
where
    F: Fn(&SurveyResponse) -> Option<&str>,
{
    let mut dist = BTreeMap::new();
    for response in responses {
        let key = field(response)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN);
        *dist.entry(key.to_string()).or_insert(0) += 1;
    }
    dist
}

pub fn device_distribution(responses: &[SurveyResponse]) -> BTreeMap<String, u64> {
    metadata_distribution(responses, |r| r.metadata.device.as_deref())
}

pub fn browser_distribution(responses: &[SurveyResponse]) -> BTreeMap<String, u64> {
    metadata_distribution(responses, |r| r.metadata.browser.as_deref())
}

pub fn location_distribution(responses: &[SurveyResponse]) -> BTreeMap<String, u64> {
    metadata_distribution(responses, |r| r.metadata.location.as_deref())
}
