//! Cross-survey composition (growth, rankings, trends)
//!
//! Pure helpers on top of the aggregation engine.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::models::{Survey, SurveyPerformance, SurveyResponse, TimeWindow, TrendPoint};

use crate::aggregation::completion_stats;
use crate::utils::time::business_date;

/// Upper bound on zero-filled trend days
const MAX_TREND_DAYS: i64 = 366;

/// `(current - previous) / previous * 100`; 100 when growing from zero, else 0
pub fn growth_rate(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// Rank surveys by completion rate desc, response count desc, id asc
pub fn top_surveys(
    surveys: &[Survey],
    responses: &[SurveyResponse],
    limit: usize,
) -> Vec<SurveyPerformance> {
    let mut by_survey: HashMap<i64, Vec<SurveyResponse>> = HashMap::new();
    for r in responses {
        by_survey.entry(r.survey_id).or_default().push(r.clone());
    }

    let mut ranked: Vec<SurveyPerformance> = surveys
        .iter()
        .map(|s| {
            let stats = by_survey
                .get(&s.id)
                .map(|rs| completion_stats(rs))
                .unwrap_or_default();
            SurveyPerformance {
                survey_id: s.id,
                title: s.title.clone(),
                response_count: stats.total_responses,
                completion_rate: stats.completion_rate,
                average_completion_time: stats.average_completion_time,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.completion_rate
            .total_cmp(&a.completion_rate)
            .then_with(|| b.response_count.cmp(&a.response_count))
            .then_with(|| a.survey_id.cmp(&b.survey_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Daily response counts in the business time zone, oldest first
///
/// With a window every day in it is present (zero-filled); without one only
/// days that have responses appear.
pub fn response_trend(
    responses: &[SurveyResponse],
    window: Option<TimeWindow>,
    tz: Tz,
) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    if let Some(w) = window
        && w.to > w.from
    {
        let first = business_date(w.from, tz);
        let last = business_date(w.to - 1, tz);
        let mut day = first;
        let mut filled = 0;
        while day <= last && filled < MAX_TREND_DAYS {
            days.insert(day, 0);
            filled += 1;
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    for r in responses {
        *days.entry(business_date(r.submitted_at, tz)).or_insert(0) += 1;
    }

    days.into_iter()
        .map(|(date, count)| TrendPoint {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DeliveryConfig, Respondent, ResponseMetadata, SurveyStatus};

    const DAY: i64 = 86_400_000;
    // 2024-01-01 00:00 UTC
    const JAN_1: i64 = 1_704_067_200_000;

    fn survey(id: i64) -> Survey {
        Survey {
            id,
            title: format!("Survey {id}"),
            description: None,
            status: SurveyStatus::Active,
            category: None,
            delivery: DeliveryConfig::default(),
            questions: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn response(survey_id: i64, submitted_at: i64) -> SurveyResponse {
        SurveyResponse {
            id: submitted_at,
            survey_id,
            respondent: Respondent::default(),
            submitted_at,
            answers: vec![],
            client_id: None,
            client_reference: None,
            metadata: ResponseMetadata::default(),
        }
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(15, 10), 50.0);
        assert_eq!(growth_rate(5, 10), -50.0);
        assert_eq!(growth_rate(3, 0), 100.0);
        assert_eq!(growth_rate(0, 0), 0.0);
        assert_eq!(growth_rate(0, 4), -100.0);
    }

    #[test]
    fn test_top_surveys_ordering() {
        let surveys = vec![survey(3), survey(1), survey(2), survey(4)];
        let responses = vec![
            response(1, JAN_1),
            response(2, JAN_1),
            response(2, JAN_1 + 1),
            response(3, JAN_1),
        ];

        let top = top_surveys(&surveys, &responses, 3);
        let ids: Vec<i64> = top.iter().map(|p| p.survey_id).collect();
        // survey 2 has most responses; 1 and 3 tie and fall back to id; 4 has none
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(top[0].response_count, 2);
        assert_eq!(top[0].completion_rate, 100.0);
    }

    #[test]
    fn test_top_surveys_with_no_responses() {
        let top = top_surveys(&[survey(1)], &[], 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].completion_rate, 0.0);
        assert!(top_surveys(&[], &[], 5).is_empty());
    }

    #[test]
    fn test_trend_without_window_lists_active_days() {
        let responses = vec![
            response(1, JAN_1 + 10),
            response(1, JAN_1 + 2 * DAY),
            response(1, JAN_1 + 20),
        ];
        let trend = response_trend(&responses, None, Tz::UTC);
        assert_eq!(
            trend,
            vec![
                TrendPoint { date: "2024-01-01".into(), count: 2 },
                TrendPoint { date: "2024-01-03".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_trend_window_is_zero_filled() {
        let window = TimeWindow::new(JAN_1, JAN_1 + 3 * DAY).unwrap();
        let responses = vec![response(1, JAN_1 + DAY + 5)];
        let trend = response_trend(&responses, Some(window), Tz::UTC);
        let counts: Vec<u64> = trend.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![0, 1, 0]);
        assert_eq!(trend[2].date, "2024-01-03");
    }

    #[test]
    fn test_trend_empty() {
        assert!(response_trend(&[], None, Tz::UTC).is_empty());
    }
}
