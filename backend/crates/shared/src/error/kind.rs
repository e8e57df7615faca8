//! Error Kind
//!
//! [`ErrorKind`] is the closed set of outcomes the API can report. Each kind
//! owns its HTTP status, reason phrase and the problem-type slug used in
//! RFC 7807 bodies.

use serde::Serialize;

/// Error classification
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::UnprocessableEntity;
/// assert_eq!(kind.status_code(), 422);
/// assert_eq!(kind.slug(), "rule-violation");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input, including an invalid RUT
    BadRequest,
    /// No session or bad credentials
    Unauthorized,
    /// Role does not allow the operation
    Forbidden,
    NotFound,
    /// Uniqueness (RUT, record number, one checklist per match)
    Conflict,
    /// Upload above the configured limit
    PayloadTooLarge,
    /// Well-formed request that breaks a clinical rule
    UnprocessableEntity,
    /// Account temporarily locked after repeated login failures
    Locked,
    InternalServerError,
    /// Database pool exhausted or unreachable
    ServiceUnavailable,
}

impl ErrorKind {
    const fn parts(self) -> (u16, &'static str, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request", "invalid-input"),
            ErrorKind::Unauthorized => (401, "Unauthorized", "unauthenticated"),
            ErrorKind::Forbidden => (403, "Forbidden", "forbidden"),
            ErrorKind::NotFound => (404, "Not Found", "not-found"),
            ErrorKind::Conflict => (409, "Conflict", "conflict"),
            ErrorKind::PayloadTooLarge => (413, "Payload Too Large", "payload-too-large"),
            ErrorKind::UnprocessableEntity => (422, "Unprocessable Entity", "rule-violation"),
            ErrorKind::Locked => (423, "Locked", "account-locked"),
            ErrorKind::InternalServerError => (500, "Internal Server Error", "internal"),
            ErrorKind::ServiceUnavailable => (503, "Service Unavailable", "unavailable"),
        }
    }

    #[inline]
    pub const fn status_code(self) -> u16 {
        self.parts().0
    }

    /// Standard reason phrase
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.parts().1
    }

    /// Stable identifier for the `type` member of a problem document
    #[inline]
    pub const fn slug(self) -> &'static str {
        self.parts().2
    }

    /// 5xx errors are logged with their source and never shown to clients
    #[inline]
    pub const fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
