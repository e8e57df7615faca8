//! Clinic Error Types
//!
//! Clinic-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::database_error_kind;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::rut::RutError;
use platform::storage::StorageError;
use thiserror::Error;

pub type ClinicResult<T> = Result<T, ClinicError>;

#[derive(Debug, Error)]
pub enum ClinicError {
    #[error(transparent)]
    InvalidRut(#[from] RutError),

    /// `{0}` names the missing record ("Player", "Injury", ...)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique key already used; `field` is the offending input
    #[error("{message}")]
    Conflict {
        field: &'static str,
        message: String,
    },

    /// Request is well-formed but breaks a clinical rule
    #[error("{message}")]
    RuleViolation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("File exceeds the {limit_bytes} byte upload limit")]
    PayloadTooLarge { limit_bytes: usize },

    /// Field-scoped validation error
    #[error(transparent)]
    Rejected(AppError),

    /// Missing session or insufficient role
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClinicError {
    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        ClinicError::Conflict {
            field,
            message: message.into(),
        }
    }

    pub fn rule(field: Option<&'static str>, message: impl Into<String>) -> Self {
        ClinicError::RuleViolation {
            field,
            message: message.into(),
        }
    }

    /// 400 scoped to `field`
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ClinicError::Rejected(AppError::bad_request(message.into()).with_field(field))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClinicError::InvalidRut(_) => ErrorKind::BadRequest,
            ClinicError::NotFound(_) => ErrorKind::NotFound,
            ClinicError::Conflict { .. } => ErrorKind::Conflict,
            ClinicError::RuleViolation { .. } => ErrorKind::UnprocessableEntity,
            ClinicError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            ClinicError::Rejected(e) => e.kind(),
            ClinicError::Auth(e) => e.kind(),
            ClinicError::Storage(StorageError::NotFound(_)) => ErrorKind::NotFound,
            ClinicError::Storage(StorageError::PathTraversal(_)) => ErrorKind::BadRequest,
            ClinicError::Database(e) => database_error_kind(e),
            ClinicError::Storage(_) | ClinicError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            ClinicError::InvalidRut(e) => e.into(),
            ClinicError::Rejected(e) => e,
            ClinicError::Database(e) => e.into(),
            ClinicError::Auth(e) => e.into_app_error(),
            ClinicError::Conflict { field, message } => AppError::conflict(message).with_field(field),
            ClinicError::RuleViolation { field, message } => {
                let err = AppError::unprocessable(message);
                match field {
                    Some(field) => err.with_field(field),
                    None => err,
                }
            }
            ClinicError::Storage(StorageError::NotFound(_)) => {
                AppError::not_found("Stored file is missing")
            }
            ClinicError::PayloadTooLarge { limit_bytes } => AppError::payload_too_large(format!(
                "File exceeds the {} MB upload limit",
                limit_bytes / (1024 * 1024)
            ))
            .with_field("file"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ClinicError::Database(e) => tracing::error!(error = %e, "Clinic database error"),
            ClinicError::Storage(e) => tracing::error!(error = %e, "Clinic storage error"),
            ClinicError::Internal(msg) => tracing::error!(message = %msg, "Clinic internal error"),
            ClinicError::RuleViolation { message, .. } => {
                tracing::info!(message = %message, "Clinical rule rejected request")
            }
            _ => tracing::debug!(error = %self, "Clinic error"),
        }
    }
}

impl IntoResponse for ClinicError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for ClinicError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            ClinicError::Internal(err.to_string())
        } else {
            ClinicError::Rejected(err)
        }
    }
}

impl From<sqlx::Error> for ClinicError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                return match constraint {
                    c if c.contains("rut") => {
                        ClinicError::conflict("rut", "A player with this RUT already exists")
                    }
                    c if c.contains("record_number") => {
                        ClinicError::conflict("recordNumber", "Record number already in use")
                    }
                    c if c.contains("divisions_name") => {
                        ClinicError::conflict("name", "A division with this name already exists")
                    }
                    c if c.contains("daily_status") => ClinicError::conflict(
                        "date",
                        "A status was already recorded for this injury on that day",
                    ),
                    c if c.contains("checklists_player_match") => ClinicError::conflict(
                        "match",
                        "A checklist already exists for this player and match",
                    ),
                    _ => ClinicError::conflict("id", "Record already exists"),
                };
            }
            if db_err.is_foreign_key_violation() {
                return ClinicError::rule(None, "Referenced record does not exist");
            }
        }
        ClinicError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ClinicError::NotFound("Player").status_code(), 404);
        assert_eq!(ClinicError::conflict("rut", "dup").status_code(), 409);
        assert_eq!(ClinicError::rule(None, "x").status_code(), 422);
        assert_eq!(ClinicError::PayloadTooLarge { limit_bytes: 1 }.status_code(), 413);
        assert_eq!(ClinicError::Auth(AuthError::InsufficientRole).status_code(), 403);
        assert_eq!(
            ClinicError::Storage(StorageError::PathTraversal("..".into())).status_code(),
            400
        );
        assert_eq!(ClinicError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_field_scoping() {
        let app = ClinicError::InvalidRut(RutError::InvalidBodyLength).into_app_error();
        assert_eq!(app.field(), Some("rut"));

        let app = ClinicError::rule(Some("player"), "not called up").into_app_error();
        assert_eq!(app.status_code(), 422);
        assert_eq!(app.field(), Some("player"));

        let app = ClinicError::invalid("weightKg", "out of range").into_app_error();
        assert_eq!(app.field(), Some("weightKg"));
    }
}
