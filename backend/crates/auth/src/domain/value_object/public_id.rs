//! Account public id
//!
//! Staff accounts are addressed in URLs and payloads by a 21-character
//! Nanoid, never by the internal UUID or the RUT.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use nid::Nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(Nanoid);

impl PublicId {
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    /// A malformed id cannot name an account, so it reads as 404
    pub fn parse_str(s: &str) -> AppResult<Self> {
        s.parse::<Nanoid>()
            .map(PublicId)
            .map_err(|_| AppError::not_found("Account not found"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
