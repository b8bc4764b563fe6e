use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::services::enrollment::EnrollmentError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation errors (3xxx)
    #[serde(rename = "VAL_3001")]
    InvalidInput,
    #[serde(rename = "VAL_3002")]
    MissingRequiredField,
    #[serde(rename = "VAL_3003")]
    InvalidFormat,
    #[serde(rename = "VAL_3009")]
    StudentLimitExceeded,
    #[serde(rename = "VAL_3010")]
    UnknownStudent,

    // Resource errors (4xxx)
    #[serde(rename = "RES_4001")]
    NotFound,

    // Database errors (7xxx)
    #[serde(rename = "DB_7002")]
    QueryFailed,
    #[serde(rename = "DB_7003")]
    DatabaseTransactionFailed,
    #[serde(rename = "DB_7004")]
    ConstraintViolation,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidInput => 3001,
            ErrorCode::MissingRequiredField => 3002,
            ErrorCode::InvalidFormat => 3003,
            ErrorCode::StudentLimitExceeded => 3009,
            ErrorCode::UnknownStudent => 3010,

            ErrorCode::NotFound => 4001,

            ErrorCode::QueryFailed => 7002,
            ErrorCode::DatabaseTransactionFailed => 7003,
            ErrorCode::ConstraintViolation => 7004,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input provided",
            ErrorCode::MissingRequiredField => "Required field is missing",
            ErrorCode::InvalidFormat => "Invalid format provided",
            ErrorCode::StudentLimitExceeded => "Too many students for one course",
            ErrorCode::UnknownStudent => "Referenced student does not exist",

            ErrorCode::NotFound => "The requested resource was not found",

            ErrorCode::QueryFailed => "Database query failed",
            ErrorCode::DatabaseTransactionFailed => "Database transaction failed",
            ErrorCode::ConstraintViolation => "Database constraint violation",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFormat
            | ErrorCode::StudentLimitExceeded
            | ErrorCode::UnknownStudent => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ConstraintViolation => StatusCode::CONFLICT,
            ErrorCode::QueryFailed | ErrorCode::DatabaseTransactionFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub request_id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub code_number: u16,
    pub message: String,
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{1}")]
    WithCode(ErrorCode, String),

    #[error("{1}")]
    WithCodeAndDetails(ErrorCode, String, String),

    #[error("Validation failed: {field}")]
    ValidationWithField {
        code: ErrorCode,
        field: String,
        message: String,
    },
}

impl ApiError {
    /// Create error with specific error code
    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError::WithCode(code, message.into())
    }

    /// Create error with code and additional details
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        ApiError::WithCodeAndDetails(code, message.into(), details.into())
    }

    /// Helper: Resource not found
    pub fn not_found(resource: &str, id: i64) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    /// Get error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Database(e) => database_error_code(e),
            ApiError::WithCode(code, _) => *code,
            ApiError::WithCodeAndDetails(code, _, _) => *code,
            ApiError::ValidationWithField { code, .. } => *code,
        }
    }

    /// Get status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationWithField { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => self.error_code().status(),
        }
    }

    /// Get error details
    fn error_details(&self) -> Option<String> {
        match self {
            ApiError::WithCodeAndDetails(_, _, details) => Some(details.clone()),
            _ => None,
        }
    }

    /// Get field name for validation errors
    fn error_field(&self) -> Option<String> {
        match self {
            ApiError::ValidationWithField { field, .. } => Some(field.clone()),
            _ => None,
        }
    }

    /// Message shown to clients; server-side causes stay in the logs
    fn public_message(&self) -> String {
        match self {
            ApiError::WithCode(_, msg) | ApiError::WithCodeAndDetails(_, msg, _) => msg.clone(),
            ApiError::ValidationWithField { message, .. } => message.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::Database(_) => self.error_code().message().to_string(),
        }
    }

    /// Log error with appropriate level
    fn log_error(&self, request_id: &str) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    request_id = %request_id,
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    request_id = %request_id,
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

fn database_error_code(err: &sqlx::Error) -> ErrorCode {
    match err {
        sqlx::Error::RowNotFound => ErrorCode::NotFound,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ErrorCode::UnknownStudent,
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_check_violation() => {
            ErrorCode::ConstraintViolation
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ErrorCode::DatabaseTransactionFailed
        }
        _ => ErrorCode::QueryFailed,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let status = self.status_code();
        let code = self.error_code();

        self.log_error(&request_id);

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code,
                code_number: code.code(),
                message: self.public_message(),
                details: self.error_details(),
                field: self.error_field(),
            },
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        let code = match err {
            EnrollmentError::TooManyStudents { .. } => ErrorCode::StudentLimitExceeded,
            EnrollmentError::InvalidStudentId(_) => ErrorCode::InvalidInput,
            EnrollmentError::UnknownStudents(_) => ErrorCode::UnknownStudent,
        };
        ApiError::ValidationWithField {
            code,
            field: "students".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                ApiError::ValidationWithField {
                    code: ErrorCode::InvalidInput,
                    field: field.to_string(),
                    message,
                }
            }
            None => ApiError::with_code(ErrorCode::InvalidInput, errors.to_string()),
        }
    }
}

/// Convert Axum JSON rejections into structured API errors
impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        match err {
            JsonRejection::JsonDataError(e) => deserialize_error(e.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                ApiError::with_code(ErrorCode::InvalidFormat, "Invalid JSON format")
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::with_code(ErrorCode::InvalidFormat, "JSON content type required")
            }
            other => ApiError::with_details(
                ErrorCode::InvalidInput,
                "Invalid request body format",
                other.body_text(),
            ),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(err: FormRejection) -> Self {
        match err {
            FormRejection::InvalidFormContentType(_) => {
                ApiError::with_code(ErrorCode::InvalidFormat, "Form content type required")
            }
            other => deserialize_error(other.body_text()),
        }
    }
}

/// Query strings the handler could not deserialize; listing filters on
/// courses never reach this, they are parsed leniently.
impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::with_details(
            ErrorCode::InvalidInput,
            "Invalid query parameters",
            err.body_text(),
        )
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        ApiError::with_details(ErrorCode::InvalidFormat, "Invalid path parameter", err.body_text())
    }
}

/// Body that parsed but did not fit the target type
fn deserialize_error(detail: String) -> ApiError {
    match extract_missing_field(&detail) {
        Some(field) => ApiError::ValidationWithField {
            code: ErrorCode::MissingRequiredField,
            message: format!("{} is required", field),
            field,
        },
        None => ApiError::with_details(ErrorCode::InvalidInput, "Invalid input provided", detail),
    }
}

/// Pull the field name out of serde's "missing field `name`" message
fn extract_missing_field(error: &str) -> Option<String> {
    let start = error.find("missing field `")? + "missing field `".len();
    let rest = &error[start..];
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
