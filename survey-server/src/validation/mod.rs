//! Validation Stage (答卷校验)
//!
//! - [`validate`] marks every answer valid / invalid in place, nothing is persisted
//! - [`validate_submission`] turns a submission payload into a [`SurveyResponse`]
//!   with snapshots taken from the live survey, then validates it
//!
//! The rule is chosen by the answer's snapshot type. The question definition
//! (looked up by id) only contributes rating bounds.

pub mod rules;

use std::collections::HashSet;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Question, QuestionResponse, QuestionSnapshot, Survey, SurveyResponse, SurveyResponseSubmit,
};
use shared::util::snowflake_id;

pub use rules::{is_valid_answer, parse_score};

/// Set each answer's `is_valid` flag. Deterministic and idempotent.
pub fn validate(response: &mut SurveyResponse, questions: &[Question]) {
    for answer in &mut response.answers {
        let settings = questions
            .iter()
            .find(|q| q.id == answer.question_id())
            .map(|q| &q.settings);
        answer.is_valid = is_valid_answer(answer.question_type(), &answer.value, settings);
    }
}

/// Build a validated response from a submission
///
/// Rejects answers to unknown questions, duplicate answers to one question
/// and submissions that omit a required question entirely. An answer that
/// is present but fails its type rule is kept and flagged invalid.
pub fn validate_submission(
    survey: &Survey,
    submission: SurveyResponseSubmit,
    submitted_at: i64,
) -> AppResult<SurveyResponse> {
    let mut seen = HashSet::new();
    let mut answers = Vec::with_capacity(submission.answers.len());

    for answer in submission.answers {
        let question = survey.question(answer.question_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnknownQuestionReference,
                format!(
                    "Question {} does not belong to survey {}",
                    answer.question_id, survey.id
                ),
            )
            .with_detail("question_id", answer.question_id)
        })?;

        if !seen.insert(question.id) {
            return Err(AppError::with_message(
                ErrorCode::DuplicateAnswer,
                format!("Question {} answered more than once", question.id),
            )
            .with_detail("question_id", question.id));
        }

        answers.push(QuestionResponse::new(
            QuestionSnapshot::of(question),
            answer.value,
        ));
    }

    if let Some(missing) = survey
        .questions
        .iter()
        .find(|q| q.required && !seen.contains(&q.id))
    {
        return Err(AppError::with_message(
            ErrorCode::RequiredQuestionMissing,
            format!("Required question '{}' was not answered", missing.title),
        )
        .with_detail("question_id", missing.id));
    }

    let mut response = SurveyResponse {
        id: snowflake_id(),
        survey_id: survey.id,
        respondent: submission.respondent,
        submitted_at,
        answers,
        client_id: submission.client_id,
        client_reference: submission.client_reference,
        metadata: submission.metadata,
    };
    validate(&mut response, &survey.questions);

    tracing::debug!(
        survey_id = survey.id,
        response_id = response.id,
        answers = response.answers.len(),
        valid = response.valid_answer_count(),
        "Submission validated"
    );

    Ok(response)
}
