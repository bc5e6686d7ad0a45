use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use claims_service::{ClaimsError, ValidationError};
use database_layer::DatabaseError;
use error_common::codes;
use logger_redacted::PiiRedactor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error category
    pub error_type: String,
    /// Stable machine-readable code
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Zero-based index of the rejected claim in the submitted batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: &'static str,
        record: Option<usize>,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Database(db_err) if db_err.is_connectivity() => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Database(_) => "database_error",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. } => *code,
            ApiError::NotFound { .. } => codes::resource::NOT_FOUND,
            ApiError::BadRequest { .. } => codes::validation::INVALID_FORMAT,
            ApiError::Database(db_err) => match db_err {
                DatabaseError::ConnectionFailed(_) => codes::database::CONNECTION_FAILED,
                DatabaseError::DuplicateKey(_) => codes::database::CONSTRAINT_VIOLATION,
                _ => codes::database::QUERY_FAILED,
            },
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Correct the reported field and resubmit the whole batch".to_string(),
                "No claim from a rejected batch was stored".to_string(),
            ]),
            ApiError::Database(db_err) if db_err.is_connectivity() => Some(vec![
                "No claim from this batch was stored".to_string(),
                "Resubmit the whole batch in a few moments".to_string(),
            ]),
            ApiError::Database(_) => Some(vec![
                "No claim from this batch was stored".to_string(),
                "Resubmit the whole batch; contact support if the issue persists".to_string(),
            ]),
            _ => None,
        }
    }

    /// Client-facing message for storage failures; driver details stay in the logs
    pub fn format_database_error(db_error: &DatabaseError) -> String {
        match db_error {
            DatabaseError::ConnectionFailed(_) => {
                "The claim store is unavailable; the batch was not stored.".to_string()
            }
            DatabaseError::DuplicateKey(_) => {
                "A claim identifier collided with an existing claim; the batch was not stored.".to_string()
            }
            _ => "Storing the claim batch failed; the batch was not stored.".to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let field_errors = HashMap::from([(err.field.to_string(), vec![err.constraint.to_string()])]);
        ApiError::Validation {
            message: err.to_string(),
            code: err.error_code(),
            record: err.record,
            field_errors: Some(field_errors),
        }
    }
}

impl From<ClaimsError> for ApiError {
    fn from(err: ClaimsError) -> Self {
        match err {
            ClaimsError::Validation(e) => e.into(),
            ClaimsError::Storage(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            message: format!("request body must be a JSON array of claims: {}", rejection.body_text()),
            code: codes::validation::MALFORMED_BODY,
            record: None,
            field_errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Driver messages can echo submitted values
        let logged = PiiRedactor::default().redact(&self.to_string());
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            error_code = %self.error_code(),
            status_code = %status_code.as_u16(),
            error = %logged,
            "API error occurred"
        );

        let message = match &self {
            ApiError::Database(db_err) => ApiError::format_database_error(db_err),
            _ => self.to_string(),
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            error_code: self.error_code().to_string(),
            message,
            record: match &self {
                ApiError::Validation { record, .. } => *record,
                _ => None,
            },
            suggestions: self.suggestions(),
            field_errors: match self {
                ApiError::Validation { field_errors, .. } => field_errors,
                _ => None,
            },
            timestamp: chrono::Utc::now(),
        };

        (status_code, Json(error_response)).into_response()
    }
}
