use shared::models::{CompletionStats, SurveyResponse};

use super::percentage;

/// Every persisted response counts as completed
pub fn completion_stats(responses: &[SurveyResponse]) -> CompletionStats {
    let total = responses.len() as u64;
    if total == 0 {
        return CompletionStats::default();
    }

    // i128 so client-supplied durations cannot overflow the sum
    let time_sum: i128 = responses
        .iter()
        .map(|r| i128::from(r.metadata.completion_time_secs.unwrap_or(0)))
        .sum();

    CompletionStats {
        total_responses: total,
        completion_rate: 100.0,
        average_completion_time: time_sum as f64 / total as f64,
    }
}

/// Valid answers / all answers * 100 across the whole set
pub fn validation_rate(responses: &[SurveyResponse]) -> f64 {
    let (valid, total) = responses
        .iter()
        .flat_map(|r| &r.answers)
        .fold((0u64, 0u64), |(valid, total), a| {
            (valid + u64::from(a.is_valid), total + 1)
        });
    percentage(valid, total)
}
