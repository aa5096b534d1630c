//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Message sent for payloads that fail validation
pub const INVALID_PAYLOAD_MESSAGE: &str = "Given payload is invalid!";

/// Message sent for any internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Missing(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("{}", INVALID_PAYLOAD_MESSAGE)]
    InvalidPayload(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    // Unavailable behaviour
    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    Timeout(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// A single failed validation rule on a payload field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field (`__all__` for cross-field rules)
    pub field: String,
    /// Validation rule that failed
    pub code: String,
    /// Human readable explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldError {
    /// Flatten `validator` errors into a stable, sorted list.
    pub fn from_validation(errors: &validator::ValidationErrors) -> Vec<Self> {
        let mut fields: Vec<Self> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    code: e.code.to_string(),
                    message: e.message.as_ref().map(|m| m.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        fields
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
    pub error: bool,
    /// Internal error detail, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Error description attached to every error response as an extension.
///
/// Presentation middleware reads it to render HTML or to expose
/// internal detail in development.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub detail: Option<String>,
    pub errors: Vec<FieldError>,
}

impl ErrorReport {
    /// Build the JSON body, optionally including internal detail.
    pub fn body(&self, expose_detail: bool) -> ErrorResponse {
        ErrorResponse {
            code: self.code.to_string(),
            message: self.message.clone(),
            status: self.status.as_u16(),
            error: true,
            detail: if expose_detail { self.detail.clone() } else { None },
            errors: self.errors.clone(),
        }
    }
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound | AppError::Missing(_) => "NOT_FOUND",
            AppError::Validation(_) | AppError::InvalidPayload(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotImplemented(_) => "NOT_IMPLEMENTED",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound | AppError::Missing(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidPayload(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Jwt(_) => "Invalid or expired token".to_string(),
            AppError::Database(_) | AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }

    /// Internal detail, logged and only ever shown outside production
    fn detail(&self) -> Option<String> {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                Some(e.to_string())
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                Some(e.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Some(msg.clone())
            }
            _ => None,
        }
    }

    /// Describe this error for the presentation layer
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status: self.status(),
            code: self.code(),
            message: self.user_message(),
            detail: self.detail(),
            errors: match self {
                AppError::InvalidPayload(errors) => errors.clone(),
                _ => Vec::new(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = self.report();
        let mut response = (report.status, Json(report.body(false))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;

    fn ok_or_missing(self, message: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }

    fn ok_or_missing(self, message: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::missing(message))
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        AppError::Missing(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("Session error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct SignupForm {
        #[validate(email)]
        email: String,
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[test]
    fn test_internal_errors_hide_details_by_default() {
        let report = AppError::internal("disk on fire").report();
        let body = report.body(false);

        assert_eq!(body.status, 500);
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
        assert!(body.detail.is_none());
        assert_eq!(report.body(true).detail.as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::missing("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::NotImplemented("later".into()).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            AppError::Timeout("slow".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InvalidPayload(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_field_errors_are_flattened_and_sorted() {
        let form = SignupForm {
            email: "nope".into(),
            name: "x".into(),
        };
        let errors = form.validate().unwrap_err();
        let fields = FieldError::from_validation(&errors);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "email");
        assert_eq!(fields[0].code, "email");
        assert_eq!(fields[1].field, "name");
        assert_eq!(fields[1].message.as_deref(), Some("too short"));
    }

    #[test]
    fn test_session_failures_are_internal() {
        let err = AppError::from(tower_sessions::session::Error::Store(
            tower_sessions::session_store::Error::Backend("redis down".into()),
        ));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.report().message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_into_response_attaches_report() {
        let response = AppError::bad_request("You already have an order!").into_response();
        let report = response.extensions().get::<ErrorReport>().unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(report.message, "You already have an order!");
    }
}
