//! Conversions into [`AppError`]
//!
//! Only sources that cross crate boundaries live here: RUT validation,
//! database faults the feature crates do not classify themselves, and the
//! axum response rendering.

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<crate::rut::RutError> for AppError {
    fn from(err: crate::rut::RutError) -> Self {
        AppError::bad_request(err.to_string())
            .with_field("rut")
            .with_action(err.action())
            .with_source(err)
    }
}

/// Classify a database failure that the feature crate did not map itself
///
/// Unique violations are turned into field-scoped conflicts before this
/// point; what remains is either an availability problem or a server fault.
#[cfg(feature = "sqlx")]
pub fn database_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        // Class 08 connection exception, 53 insufficient resources, 57 operator intervention
        sqlx::Error::Database(db_err)
            if db_err
                .code()
                .is_some_and(|code| ["08", "53", "57"].iter().any(|class| code.starts_with(class))) =>
        {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::InternalServerError,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let kind = database_error_kind(&err);
        let message = match kind {
            ErrorKind::ServiceUnavailable => "Database unavailable",
            ErrorKind::NotFound => "Record not found",
            _ => "Database error",
        };
        AppError::new(kind, message).with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self.problem()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rut::RutError;

    #[test]
    fn test_rut_errors_are_scoped_to_rut() {
        for err in [
            RutError::TooShort,
            RutError::NonNumericBody,
            RutError::InvalidBodyLength,
            RutError::ChecksumMismatch,
        ] {
            let app_err: AppError = err.into();
            assert_eq!(app_err.kind(), ErrorKind::BadRequest);
            assert_eq!(app_err.field(), Some("rut"));
            assert!(app_err.action().is_some());
        }
    }

    #[test]
    fn test_checksum_message() {
        let app_err: AppError = RutError::ChecksumMismatch.into();
        assert_eq!(app_err.message(), "RUT check digit does not match");
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_pool_timeout_is_unavailable() {
        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(app_err.status_code(), 503);
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.status_code(), 404);
    }
}
