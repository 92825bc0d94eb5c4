//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level errors, offending ids)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Is this a "missing resource" signal (any *NotFound code)?
    pub fn is_not_found(&self) -> bool {
        self.http_status() == StatusCode::NOT_FOUND
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }


    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }




    /// Survey `id` does not exist
    pub fn survey_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::SurveyNotFound, format!("Survey {} not found", id))
            .with_detail("survey_id", id)
    }

    /// Survey response `id` does not exist
    pub fn response_not_found(id: i64) -> Self {
        Self::with_message(
            ErrorCode::ResponseNotFound,
            format!("Survey response {} not found", id),
        )
        .with_detail("response_id", id)
    }

    /// Suggestion `id` does not exist
    pub fn suggestion_not_found(id: i64) -> Self {
        Self::with_message(
            ErrorCode::SuggestionNotFound,
            format!("Suggestion {} not found", id),
        )
        .with_detail("suggestion_id", id)
    }
}

/// Error body returned by every failing endpoint
///
/// Successful endpoints return their payload as plain JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (self.http_status(), axum::Json(ApiResponse::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "title")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "title");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_domain_not_found_constructors() {
        let err = AppError::survey_not_found(42);
        assert_eq!(err.code, ErrorCode::SurveyNotFound);
        assert_eq!(err.message, "Survey 42 not found");
        assert!(err.is_not_found());

        let err = AppError::response_not_found(7);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);

        let err = AppError::suggestion_not_found(9);
        assert!(err.is_not_found());

        assert!(!AppError::validation("bad").is_not_found());
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::SurveyNotActive, "Survey 3 is archived");
        assert_eq!(format!("{}", err), "Survey 3 is archived");
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::survey_not_found(5);
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, 1001);
        assert_eq!(response.message, "Survey 5 not found");
        assert_eq!(response.details.unwrap().get("survey_id").unwrap(), 5);
    }

    #[test]
    fn test_api_response_omits_empty_details() {
        let json = serde_json::to_string(&ApiResponse::error(&AppError::validation("bad"))).unwrap();
        assert_eq!(json, r#"{"code":2,"message":"bad"}"#);
    }

    #[test]
    fn test_error_into_response_status() {
        use axum::response::IntoResponse;
        let resp = AppError::survey_not_found(1).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
