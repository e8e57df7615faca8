//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::conversions::database_error_kind;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::rut::RutError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// RUT failed validation
    #[error(transparent)]
    InvalidRut(#[from] RutError),

    /// An account already uses this RUT
    #[error("An account with this RUT already exists")]
    RutTaken,

    #[error("Account not found")]
    AccountNotFound,

    /// Wrong RUT or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Too many failed attempts
    #[error("Account is temporarily locked")]
    AccountLocked,

    #[error("Account is disabled")]
    AccountDisabled,

    /// Session not found, expired or badly signed
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Authenticated but the role does not allow the operation
    #[error("Your role does not allow this operation")]
    InsufficientRole,

    /// Admins cannot demote or disable themselves
    #[error("You cannot remove your own administrator access")]
    SelfLockout,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    PasswordValidation(String),

    /// Field-scoped validation error raised by value objects
    #[error(transparent)]
    Rejected(AppError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidRut(_)
            | AuthError::PasswordMismatch
            | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::RutTaken => ErrorKind::Conflict,
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::AccountLocked => ErrorKind::Locked,
            AuthError::AccountDisabled | AuthError::InsufficientRole => ErrorKind::Forbidden,
            AuthError::SelfLockout => ErrorKind::UnprocessableEntity,
            AuthError::Rejected(e) => e.kind(),
            AuthError::Database(e) => database_error_kind(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::InvalidRut(e) => e.into(),
            AuthError::Rejected(e) => e,
            AuthError::Database(e) => e.into(),
            AuthError::RutTaken => AppError::conflict("An account with this RUT already exists")
                .with_field("rut")
                .with_action("Sign in instead, or ask an administrator to reset the account"),
            AuthError::PasswordMismatch => AppError::bad_request("Passwords do not match")
                .with_field("password_confirm"),
            AuthError::PasswordValidation(msg) => AppError::bad_request(msg)
                .with_field("password")
                .with_action("Choose a longer, less predictable password"),
            AuthError::AccountLocked => AppError::locked("Account is temporarily locked")
                .with_action("Wait 15 minutes before trying again"),
            AuthError::InvalidCredentials => {
                AppError::unauthorized("Invalid RUT or password")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::InsufficientRole => {
                tracing::warn!("Operation denied by role");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Rejected(err)
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation()
                && db_err.constraint().is_some_and(|c| c.contains("rut"))
            {
                return AuthError::RutTaken;
            }
        }
        AuthError::Database(err)
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::PasswordValidation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidRut(RutError::TooShort).status_code(), 400);
        assert_eq!(AuthError::RutTaken.status_code(), 409);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::AccountLocked.status_code(), 423);
        assert_eq!(AuthError::AccountDisabled.status_code(), 403);
        assert_eq!(AuthError::InsufficientRole.status_code(), 403);
        assert_eq!(AuthError::SelfLockout.status_code(), 422);
        assert_eq!(AuthError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_rut_errors_are_scoped_to_field() {
        let app = AuthError::InvalidRut(RutError::ChecksumMismatch).into_app_error();
        assert_eq!(app.field(), Some("rut"));
        assert_eq!(app.status_code(), 400);

        let app = AuthError::RutTaken.into_app_error();
        assert_eq!(app.field(), Some("rut"));
    }

    #[test]
    fn test_app_error_passthrough() {
        let err: AuthError = AppError::bad_request("Email is invalid").with_field("email").into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.into_app_error().field(), Some("email"));

        let err: AuthError = AppError::internal("boom").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
