use std::collections::{BTreeMap, HashMap};

use shared::models::{Question, QuestionResponse, QuestionType, SurveyResponse};

use super::{mean, percentage};
use crate::validation::parse_score;

pub const NPS_BUCKETS: std::ops::RangeInclusive<u8> = 0..=10;
pub const RATING_BUCKETS: std::ops::RangeInclusive<u8> = 1..=5;

fn histogram(
    responses: &[SurveyResponse],
    question_type: QuestionType,
    buckets: std::ops::RangeInclusive<u8>,
) -> BTreeMap<u8, u64> {
    let mut hist: BTreeMap<u8, u64> = buckets.clone().map(|b| (b, 0)).collect();
    for answer in responses
        .iter()
        .flat_map(|r| &r.answers)
        .filter(|a| a.question_type() == question_type)
    {
        let bucket = answer
            .value
            .as_single()
            .and_then(parse_score)
            .and_then(|n| u8::try_from(n).ok())
            .filter(|b| buckets.contains(b));
        if let Some(b) = bucket {
            *hist.entry(b).or_insert(0) += 1;
        }
    }
    hist
}

/// 0..=10 → count of nps answers (all keys present)
pub fn nps_histogram(responses: &[SurveyResponse]) -> BTreeMap<u8, u64> {
    histogram(responses, QuestionType::Nps, NPS_BUCKETS)
}

/// 1..=5 → count of rating answers (all keys present)
pub fn rating_histogram(responses: &[SurveyResponse]) -> BTreeMap<u8, u64> {
    histogram(responses, QuestionType::Rating, RATING_BUCKETS)
}

/// %promoters (9–10) − %detractors (0–6), 0 for an empty histogram
pub fn nps_score(histogram: &BTreeMap<u8, u64>) -> f64 {
    let total: u64 = histogram.values().sum();
    let promoters: u64 = histogram
        .iter()
        .filter(|(b, _)| **b >= 9)
        .map(|(_, c)| c)
        .sum();
    let detractors: u64 = histogram
        .iter()
        .filter(|(b, _)| **b <= 6)
        .map(|(_, c)| c)
        .sum();
    percentage(promoters, total) - percentage(detractors, total)
}

/// Numeric value of a scored (rating / nps) answer
pub fn answer_score(answer: &QuestionResponse) -> Option<i64> {
    if !answer.question_type().is_scored() {
        return None;
    }
    answer.value.as_single().and_then(parse_score)
}

/// Mean score per question category (rating / nps questions only)
///
/// Every category declared on a scored question gets an entry, 0 when no
/// answer parses as a number.
pub fn average_score_by_category(
    responses: &[SurveyResponse],
    questions: &[Question],
) -> BTreeMap<String, f64> {
    let categorized: HashMap<i64, &str> = questions
        .iter()
        .filter(|q| q.question_type.is_scored())
        .filter_map(|q| {
            q.category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| (q.id, c))
        })
        .collect();

    let mut scores: BTreeMap<String, Vec<f64>> = categorized
        .values()
        .map(|c| (c.to_string(), Vec::new()))
        .collect();

    for answer in responses.iter().flat_map(|r| &r.answers) {
        if !answer.question_type().is_scored() {
            continue;
        }
        let Some(category) = categorized.get(&answer.question_id()) else {
            continue;
        };
        let value = answer
            .value
            .as_single()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite());
        if let Some(v) = value
            && let Some(bucket) = scores.get_mut(*category)
        {
            bucket.push(v);
        }
    }

    scores
        .into_iter()
        .map(|(category, values)| (category, mean(&values)))
        .collect()
}
