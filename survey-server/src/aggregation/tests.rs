use shared::models::{
    AnswerValue, DeliveryConfig, Question, QuestionResponse, QuestionSettings, QuestionSnapshot,
    QuestionType, Respondent, ResponseMetadata, Survey, SurveyResponse, SurveyResponseSubmit,
    SurveyStatus,
};

use super::*;
use crate::validation::validate_submission;

const EPS: f64 = 1e-9;

fn question(id: i64, question_type: QuestionType, category: Option<&str>) -> Question {
    Question {
        id,
        survey_id: 1,
        question_type,
        title: format!("Q{id}"),
        required: false,
        options: vec![],
        settings: QuestionSettings::default(),
        category: category.map(String::from),
        position: 0,
    }
}

fn answer(id: i64, question_type: QuestionType, value: impl Into<AnswerValue>) -> QuestionResponse {
    QuestionResponse {
        question: QuestionSnapshot {
            question_id: id,
            title: format!("Q{id}"),
            question_type,
        },
        value: value.into(),
        is_valid: true,
    }
}

fn response(id: i64, answers: Vec<QuestionResponse>) -> SurveyResponse {
    SurveyResponse {
        id,
        survey_id: 1,
        respondent: Respondent::default(),
        submitted_at: id * 1000,
        answers,
        client_id: None,
        client_reference: None,
        metadata: ResponseMetadata::default(),
    }
}

fn with_device(mut r: SurveyResponse, device: Option<&str>) -> SurveyResponse {
    r.metadata.device = device.map(String::from);
    r
}

fn survey(questions: Vec<Question>) -> Survey {
    Survey {
        id: 1,
        title: "Round trip".into(),
        description: None,
        status: SurveyStatus::Active,
        category: None,
        delivery: DeliveryConfig::default(),
        questions,
        created_at: 0,
        updated_at: 0,
    }
}

// ========== Empty input ==========

#[test]
fn test_zero_responses_yield_zeroed_results() {
    let empty: &[SurveyResponse] = &[];

    let dist = answer_distribution(empty, 1);
    assert!(dist.is_empty());
    assert_eq!(dist.percentage("A"), 0.0);
    assert!(dist.to_statistics().is_empty());

    let stats = completion_stats(empty);
    assert_eq!(stats.total_responses, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert_eq!(stats.average_completion_time, 0.0);

    let nps = nps_histogram(empty);
    assert_eq!(nps.len(), 11);
    assert!(nps.values().all(|&c| c == 0));
    assert_eq!(nps_score(&nps), 0.0);

    let rating = rating_histogram(empty);
    assert_eq!(rating.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert!(rating.values().all(|&c| c == 0));

    assert!(question_type_distribution(empty).is_empty());
    assert!(device_distribution(empty).is_empty());
    assert!(browser_distribution(empty).is_empty());
    assert!(location_distribution(empty).is_empty());
    assert_eq!(validation_rate(empty), 0.0);

    let questions = vec![question(1, QuestionType::Rating, Some("Service"))];
    let averages = average_score_by_category(empty, &questions);
    assert_eq!(averages.get("Service"), Some(&0.0));
}

// ========== Distributions ==========

#[test]
fn test_multiple_choice_distribution() {
    let responses = vec![
        response(1, vec![answer(1, QuestionType::MultipleChoice, vec!["A", "B"])]),
        response(2, vec![answer(1, QuestionType::MultipleChoice, vec!["B"])]),
    ];

    let dist = answer_distribution(&responses, 1);
    assert_eq!(dist.count("A"), 1);
    assert_eq!(dist.count("B"), 2);
    assert_eq!(dist.count("C"), 0);
    assert_eq!(dist.total(), 3);
    assert!((dist.percentage("B") - 200.0 / 3.0).abs() < EPS);
    assert!((dist.percentage("A") - 100.0 / 3.0).abs() < EPS);

    let rows = dist.to_statistics();
    assert_eq!(rows[0].answer, "B");
    assert_eq!(rows[1].answer, "A");
}

#[test]
fn test_distribution_counts_sum_and_percentages_sum_to_100() {
    let responses = vec![
        response(1, vec![answer(1, QuestionType::SingleChoice, "Yes")]),
        response(2, vec![answer(1, QuestionType::SingleChoice, "No")]),
        response(3, vec![answer(1, QuestionType::SingleChoice, "Yes")]),
        response(4, vec![answer(1, QuestionType::SingleChoice, "Maybe")]),
        response(5, vec![answer(2, QuestionType::SingleChoice, "Other question")]),
    ];

    let dist = answer_distribution(&responses, 1);
    let count_sum: u64 = dist.counts().values().sum();
    assert_eq!(count_sum, dist.total());
    assert_eq!(dist.total(), 4);

    let pct_sum: f64 = dist.to_statistics().iter().map(|r| r.percentage).sum();
    assert!((pct_sum - 100.0).abs() < 1e-6);
}

#[test]
fn test_distribution_counts_option_once_per_response() {
    let responses = vec![response(
        1,
        vec![answer(1, QuestionType::MultipleChoice, vec!["A", "A", " A "])],
    )];
    let dist = answer_distribution(&responses, 1);
    assert_eq!(dist.count("A"), 1);
    assert_eq!(dist.total(), 1);
}

#[test]
fn test_distribution_skips_blank_answers() {
    let responses = vec![
        response(1, vec![answer(1, QuestionType::Text, "  ")]),
        response(2, vec![answer(1, QuestionType::Text, "fine")]),
    ];
    let dist = answer_distribution(&responses, 1);
    assert_eq!(dist.total(), 1);
    assert_eq!(dist.percentage("fine"), 100.0);
}

#[test]
fn test_question_type_distribution() {
    let responses = vec![
        response(
            1,
            vec![
                answer(1, QuestionType::Nps, "9"),
                answer(2, QuestionType::Text, "great"),
            ],
        ),
        response(2, vec![answer(1, QuestionType::Nps, "3")]),
    ];
    let dist = question_type_distribution(&responses);
    assert_eq!(dist.get(&QuestionType::Nps), Some(&2));
    assert_eq!(dist.get(&QuestionType::Text), Some(&1));
    assert_eq!(dist.get(&QuestionType::Rating), None);
}

#[test]
fn test_device_distribution_defaults_to_unknown() {
    let responses = vec![
        with_device(response(1, vec![]), Some("Mobile")),
        with_device(response(2, vec![]), None),
        with_device(response(3, vec![]), Some("Mobile")),
    ];
    let dist = device_distribution(&responses);
    assert_eq!(dist.len(), 2);
    assert_eq!(dist.get(UNKNOWN), Some(&1));
    assert_eq!(dist.get("Mobile"), Some(&2));
}

#[test]
fn test_blank_metadata_is_unknown() {
    let mut r = response(1, vec![]);
    r.metadata.browser = Some("   ".into());
    r.metadata.location = Some("Valencia".into());
    let responses = vec![r, response(2, vec![])];

    let browsers = browser_distribution(&responses);
    assert_eq!(browsers.get(UNKNOWN), Some(&2));

    let locations = location_distribution(&responses);
    assert_eq!(locations.get("Valencia"), Some(&1));
    assert_eq!(locations.get(UNKNOWN), Some(&1));
}

// ========== Histograms & scores ==========

#[test]
fn test_nps_out_of_range_is_ignored() {
    let responses = vec![
        response(1, vec![answer(1, QuestionType::Nps, "11")]),
        response(2, vec![answer(1, QuestionType::Nps, "7")]),
    ];
    let hist = nps_histogram(&responses);
    assert_eq!(hist.len(), 11);
    assert_eq!(hist.get(&7), Some(&1));
    assert_eq!(hist.values().sum::<u64>(), 1);
    assert!(!hist.contains_key(&11));
}

#[test]
fn test_nps_ignores_garbage_and_other_types() {
    let responses = vec![
        response(1, vec![answer(1, QuestionType::Nps, "ten")]),
        response(2, vec![answer(1, QuestionType::Nps, "-2")]),
        response(3, vec![answer(2, QuestionType::Rating, "5")]),
        response(4, vec![answer(1, QuestionType::Nps, vec!["9"])]),
    ];
    assert_eq!(nps_histogram(&responses).values().sum::<u64>(), 0);
}

#[test]
fn test_nps_score() {
    let responses: Vec<SurveyResponse> = ["10", "9", "9", "8", "3"]
        .iter()
        .enumerate()
        .map(|(i, v)| response(i as i64, vec![answer(1, QuestionType::Nps, *v)]))
        .collect();
    let hist = nps_histogram(&responses);
    // 3 promoters, 1 passive, 1 detractor → 60 - 20
    assert!((nps_score(&hist) - 40.0).abs() < EPS);
}

#[test]
fn test_rating_round_trip() {
    let q = question(1, QuestionType::Rating, Some("Service"));
    let s = survey(vec![q]);

    let responses: Vec<SurveyResponse> = ["5", "3", "5"]
        .iter()
        .map(|v| {
            let submission = SurveyResponseSubmit {
                answers: vec![shared::models::AnswerSubmit {
                    question_id: 1,
                    value: (*v).into(),
                }],
                ..Default::default()
            };
            validate_submission(&s, submission, 0).unwrap()
        })
        .collect();
    assert!(responses.iter().all(|r| r.answers[0].is_valid));

    let hist = rating_histogram(&responses);
    let expected: Vec<(u8, u64)> = vec![(1, 0), (2, 0), (3, 1), (4, 0), (5, 2)];
    assert_eq!(hist.into_iter().collect::<Vec<_>>(), expected);

    let averages = average_score_by_category(&responses, &s.questions);
    assert!((averages["Service"] - 13.0 / 3.0).abs() < EPS);
}

#[test]
fn test_average_score_skips_uncategorized_and_malformed() {
    let questions = vec![
        question(1, QuestionType::Rating, Some("Service")),
        question(2, QuestionType::Nps, Some("Loyalty")),
        question(3, QuestionType::Rating, None),
        question(4, QuestionType::Text, Some("Comments")),
    ];
    let responses = vec![
        response(
            1,
            vec![
                answer(1, QuestionType::Rating, "4"),
                answer(2, QuestionType::Nps, "n/a"),
                answer(3, QuestionType::Rating, "1"),
                answer(4, QuestionType::Text, "5"),
            ],
        ),
        response(2, vec![answer(1, QuestionType::Rating, "2")]),
    ];

    let averages = average_score_by_category(&responses, &questions);
    assert_eq!(averages.len(), 2);
    assert!((averages["Service"] - 3.0).abs() < EPS);
    assert_eq!(averages["Loyalty"], 0.0);
    assert!(!averages.contains_key("Comments"));
}

#[test]
fn test_answer_score() {
    assert_eq!(answer_score(&answer(1, QuestionType::Nps, " 8 ")), Some(8));
    assert_eq!(answer_score(&answer(1, QuestionType::Number, "8")), None);
    assert_eq!(answer_score(&answer(1, QuestionType::Rating, "x")), None);
}

// ========== Completion & validity ==========

#[test]
fn test_completion_stats() {
    let mut a = response(1, vec![]);
    a.metadata.completion_time_secs = Some(120);
    let mut b = response(2, vec![]);
    b.metadata.completion_time_secs = Some(60);
    let c = response(3, vec![]);

    let stats = completion_stats(&[a, b, c]);
    assert_eq!(stats.total_responses, 3);
    assert_eq!(stats.completion_rate, 100.0);
    assert!((stats.average_completion_time - 60.0).abs() < EPS);
}

#[test]
fn test_completion_stats_large_durations_do_not_overflow() {
    let mut a = response(1, vec![]);
    a.metadata.completion_time_secs = Some(i64::MAX);
    let mut b = response(2, vec![]);
    b.metadata.completion_time_secs = Some(i64::MAX);

    let stats = completion_stats(&[a, b]);
    assert_eq!(stats.total_responses, 2);
    assert!(stats.average_completion_time > 0.0);
    assert!((stats.average_completion_time - i64::MAX as f64).abs() / (i64::MAX as f64) < EPS);
}

#[test]
fn test_validation_rate() {
    let mut bad = answer(2, QuestionType::Email, "nope");
    bad.is_valid = false;
    let responses = vec![
        response(1, vec![answer(1, QuestionType::Text, "ok"), bad]),
        response(2, vec![answer(1, QuestionType::Text, "ok")]),
        response(3, vec![answer(1, QuestionType::Text, "ok")]),
    ];
    assert!((validation_rate(&responses) - 75.0).abs() < EPS);
}

// ========== Purity ==========

#[test]
fn test_aggregation_is_idempotent() {
    let responses = vec![
        with_device(
            response(
                1,
                vec![
                    answer(1, QuestionType::MultipleChoice, vec!["A", "B"]),
                    answer(2, QuestionType::Nps, "9"),
                ],
            ),
            Some("Desktop"),
        ),
        response(2, vec![answer(2, QuestionType::Nps, "4")]),
    ];
    let snapshot = responses.clone();

    assert_eq!(answer_distribution(&responses, 1), answer_distribution(&responses, 1));
    assert_eq!(nps_histogram(&responses), nps_histogram(&responses));
    assert_eq!(device_distribution(&responses), device_distribution(&responses));
    assert_eq!(completion_stats(&responses), completion_stats(&responses));
    assert_eq!(
        question_type_distribution(&responses),
        question_type_distribution(&responses)
    );
    assert_eq!(responses, snapshot);
}

#[test]
fn test_percentage_helper() {
    assert_eq!(percentage(0, 0), 0.0);
    assert_eq!(percentage(5, 0), 0.0);
    assert_eq!(percentage(1, 4), 25.0);
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
}
