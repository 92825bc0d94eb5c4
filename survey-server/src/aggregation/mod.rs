//! Aggregation Engine (统计聚合)
//!
//! Pure functions over an already loaded `&[SurveyResponse]`. Nothing here
//! touches the database, mutates its input or raises not-found; an empty
//! slice yields zeroed results.
//!
//! Numeric semantics: percentages are `count / total * 100.0` as `f64`,
//! unrounded, and `0.0` when `total == 0`.
//!
//! Counting ignores the validity flag: every non-blank answer counts, numeric
//! aggregations just skip values that do not parse or fall out of range.

mod completion;
mod distribution;
mod scores;

#[cfg(test)]
mod tests;

pub use completion::{completion_stats, validation_rate};
pub use distribution::{
    AnswerDistribution, UNKNOWN, answer_distribution, browser_distribution, device_distribution,
    location_distribution, question_type_distribution,
};
pub use scores::{
    NPS_BUCKETS, RATING_BUCKETS, answer_score, average_score_by_category, nps_histogram,
    nps_score, rating_histogram,
};

/// `count / total * 100`, 0 when `total == 0`
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Arithmetic mean, 0 for an empty input
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
