//! Application Error
//!
//! [`AppError`] is what leaves the process: feature crates keep their own
//! `thiserror` enums and convert into this type at the HTTP boundary, where
//! it renders as an RFC 7807 [`ProblemDetails`] document.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde::Serialize;

use super::kind::ErrorKind;

type Text = Cow<'static, str>;

/// Unified application error
///
/// * `kind` - classification, mapped to an HTTP status code
/// * `message` - shown to staff
/// * `field` - camelCase request field the error refers to
/// * `action` - what to do next
/// * `source` - underlying error, logged but never serialized
///
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::bad_request("The RUT check digit does not match")
///     .with_field("rut")
///     .with_action("Check the digit after the hyphen");
/// assert_eq!(err.field(), Some("rut"));
/// assert_eq!(err.status_code(), 400);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Text,
    field: Option<Text>,
    action: Option<Text>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

/// RFC 7807 body
#[derive(Debug, Serialize)]
pub struct ProblemDetails<'a> {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
}

const SERVER_DETAIL: &str = "An unexpected error occurred";

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Text>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            action: None,
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn payload_too_large(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, message)
    }

    /// 422, a clinical rule was broken
    pub fn unprocessable(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::UnprocessableEntity, message)
    }

    pub fn locked(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::Locked, message)
    }

    pub fn internal(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn service_unavailable(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Scope the error to a request field (`rut`, `callUps`, ...)
    pub fn with_field(mut self, field: impl Into<Text>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<Text>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// Client-facing document; server errors keep their details in the log
    pub fn problem(&self) -> ProblemDetails<'_> {
        let hide = self.is_server_error();
        ProblemDetails {
            problem_type: format!("/problems/{}", self.kind.slug()),
            title: self.kind.as_str(),
            status: self.status_code(),
            detail: if hide { SERVER_DETAIL } else { self.message() },
            field: if hide { None } else { self.field() },
            action: if hide { None } else { self.action() },
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("field", &self.field)
            .field("action", &self.action)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{} ({field}): {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
