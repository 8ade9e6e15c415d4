use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;

/// MongoDB server error code for unique index violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation error: {}", summarize_fields(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("Already passed: {0}")]
    AlreadyPassed(String),

    #[error("Attempts exhausted: {0}")]
    AttemptsExhausted(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

fn is_duplicate_key_code(code: i32) -> bool {
    code == DUPLICATE_KEY_CODE
}

fn summarize_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::ValidationError(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::AlreadyPassed(_) => "ALREADY_PASSED",
            AppError::AttemptsExhausted(_) => "ATTEMPTS_EXHAUSTED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, AppError::DatabaseError(_) | AppError::InternalError(_))
    }

    /// Message safe to hand to a client. Storage and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// True when a unique index rejected the write, whether the server
    /// reported it as a write error or as a command error.
    pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                is_duplicate_key_code(write_error.code)
            }
            ErrorKind::Command(command_error) => is_duplicate_key_code(command_error.code),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub error_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyPassed(_) | AppError::AttemptsExhausted(_) | AppError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            log::error!("{}", self);
        }

        let fields = match self {
            AppError::InvalidFields(fields) => Some(fields.clone()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
            code: self.status_code().as_u16(),
            error_code: self.error_code(),
            fields,
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_string();
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::InvalidFields(fields)
    }
}

impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if self.is_internal() {
            log::error!("{}", self);
        }

        async_graphql::Error::new(self.public_message()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("test".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AttemptsExhausted("test".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_rejections_have_distinct_codes() {
        let codes = [
            AppError::AlreadyPassed("x".into()).error_code(),
            AppError::AttemptsExhausted("x".into()).error_code(),
            AppError::Conflict("x".into()).error_code(),
        ];
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("assessment".into());
        assert_eq!(err.to_string(), "Not found: assessment");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::DatabaseError("connection refused at 10.0.0.3".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_graphql_extension_hides_internal_details() {
        let err = AppError::DatabaseError("connection refused at 10.0.0.3".into()).extend();
        assert_eq!(err.message, "Internal server error");

        let code = err.extensions.as_ref().and_then(|ext| ext.get("code")).cloned();
        assert_eq!(
            code,
            Some(async_graphql::Value::String("DATABASE_ERROR".to_string()))
        );
    }

    #[test]
    fn test_graphql_extension_keeps_client_errors() {
        let err = AppError::NotFound("assessment".into()).extend();
        assert_eq!(err.message, "Not found: assessment");
    }

    #[test]
    fn test_duplicate_key_code() {
        assert!(is_duplicate_key_code(11000));
        assert!(!is_duplicate_key_code(11001));
        assert!(!is_duplicate_key_code(0));
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_become_field_errors() {
        let err: AppError = Sample {
            name: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();

        match err {
            AppError::InvalidFields(fields) => {
                assert_eq!(fields, vec![FieldError::new("name", "must not be empty")]);
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }
}
