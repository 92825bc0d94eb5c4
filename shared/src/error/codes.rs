//! Unified error codes for the survey platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Survey errors
//! - 2xxx: Response errors
//! - 3xxx: Suggestion errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Business rule violation
    BusinessRule = 9,

    // ==================== 1xxx: Survey ====================
    /// Survey not found
    SurveyNotFound = 1001,
    /// Survey is not accepting responses
    SurveyNotActive = 1002,
    /// Survey has no questions
    SurveyHasNoQuestions = 1003,
    /// Question not found
    QuestionNotFound = 1004,
    /// Unrecognized question type tag
    UnknownQuestionType = 1005,
    /// Choice question has no usable options
    InvalidQuestionOptions = 1006,
    /// Delivery configuration is inconsistent
    InvalidDeliveryConfig = 1007,
    /// Survey status change is not allowed
    InvalidSurveyTransition = 1008,

    // ==================== 2xxx: Response ====================
    /// Survey response not found
    ResponseNotFound = 2001,
    /// A required question was not answered
    RequiredQuestionMissing = 2002,
    /// Answer references a question that is not part of the survey
    UnknownQuestionReference = 2003,
    /// Same question answered more than once in one submission
    DuplicateAnswer = 2004,

    // ==================== 3xxx: Suggestion ====================
    /// Suggestion not found
    SuggestionNotFound = 3001,
    /// Suggestion workflow transition is not allowed
    InvalidSuggestionTransition = 3002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Backing data source could not be reached
    DataSourceUnavailable = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::BusinessRule => "Business rule violation",

            // Survey
            ErrorCode::SurveyNotFound => "Survey not found",
            ErrorCode::SurveyNotActive => "Survey is not accepting responses",
            ErrorCode::SurveyHasNoQuestions => "Survey has no questions",
            ErrorCode::QuestionNotFound => "Question not found",
            ErrorCode::UnknownQuestionType => "Unknown question type",
            ErrorCode::InvalidQuestionOptions => "Question options are invalid",
            ErrorCode::InvalidDeliveryConfig => "Delivery configuration is invalid",
            ErrorCode::InvalidSurveyTransition => "Survey status change is not allowed",

            // Response
            ErrorCode::ResponseNotFound => "Survey response not found",
            ErrorCode::RequiredQuestionMissing => "A required question was not answered",
            ErrorCode::UnknownQuestionReference => "Answer references an unknown question",
            ErrorCode::DuplicateAnswer => "Question answered more than once",

            // Suggestion
            ErrorCode::SuggestionNotFound => "Suggestion not found",
            ErrorCode::InvalidSuggestionTransition => "Suggestion status change is not allowed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::DataSourceUnavailable => "Data source unavailable",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::BusinessRule),

            // Survey
            1001 => Ok(ErrorCode::SurveyNotFound),
            1002 => Ok(ErrorCode::SurveyNotActive),
            1003 => Ok(ErrorCode::SurveyHasNoQuestions),
            1004 => Ok(ErrorCode::QuestionNotFound),
            1005 => Ok(ErrorCode::UnknownQuestionType),
            1006 => Ok(ErrorCode::InvalidQuestionOptions),
            1007 => Ok(ErrorCode::InvalidDeliveryConfig),
            1008 => Ok(ErrorCode::InvalidSurveyTransition),

            // Response
            2001 => Ok(ErrorCode::ResponseNotFound),
            2002 => Ok(ErrorCode::RequiredQuestionMissing),
            2003 => Ok(ErrorCode::UnknownQuestionReference),
            2004 => Ok(ErrorCode::DuplicateAnswer),

            // Suggestion
            3001 => Ok(ErrorCode::SuggestionNotFound),
            3002 => Ok(ErrorCode::InvalidSuggestionTransition),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::DataSourceUnavailable),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
