//! RUT validation errors

use thiserror::Error;

/// RUT validation failure
///
/// Every variant is a user-input error. None of them is fatal; callers turn
/// them into a `400 Bad Request` scoped to the `rut` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RutError {
    /// Fewer than two significant characters after normalization
    #[error("RUT is too short")]
    TooShort,

    /// The body contains something other than digits (a `K` before the check digit)
    #[error("RUT body must contain digits only")]
    NonNumericBody,

    /// Body is not 7 or 8 digits long
    #[error("RUT body must have 7 or 8 digits")]
    InvalidBodyLength,

    /// Supplied check digit does not match the computed one
    #[error("RUT check digit does not match")]
    ChecksumMismatch,

    /// Strict mode only: a character other than digits, `K`, dots, hyphens or spaces
    #[error("RUT contains an invalid character: {0:?}")]
    InvalidCharacter(char),
}

impl RutError {
    /// Stable machine-readable code, used in logs
    pub const fn code(&self) -> &'static str {
        match self {
            RutError::TooShort => "too_short",
            RutError::NonNumericBody => "non_numeric_body",
            RutError::InvalidBodyLength => "invalid_body_length",
            RutError::ChecksumMismatch => "checksum_mismatch",
            RutError::InvalidCharacter(_) => "invalid_character",
        }
    }

    /// What the user should fix
    pub const fn action(&self) -> &'static str {
        match self {
            RutError::TooShort | RutError::InvalidBodyLength => {
                "Enter the full RUT, e.g. 12.345.678-5"
            }
            RutError::NonNumericBody => "Only the check digit may be a K",
            RutError::ChecksumMismatch => "Check the digit after the hyphen",
            RutError::InvalidCharacter(_) => "Use only digits, K, dots and a hyphen",
        }
    }
}
