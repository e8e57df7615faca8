//! Person Name Value Object
//!
//! First and last names of staff. Trimmed, inner whitespace collapsed,
//! 1 to 100 characters.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name; `field` scopes the error (`first_name`, `last_name`)
    pub fn new(raw: &str, field: &'static str) -> AppResult<Self> {
        let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty").with_field(field));
        }
        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                NAME_MAX_LENGTH
            ))
            .with_field(field));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters").with_field(field));
        }

        Ok(Self(name))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_normalizes_whitespace() {
        let name = PersonName::new("  María   José ", "first_name").unwrap();
        assert_eq!(name.as_str(), "María José");
    }

    #[test]
    fn test_person_name_rejects() {
        let err = PersonName::new("   ", "last_name").unwrap_err();
        assert_eq!(err.field(), Some("last_name"));
        assert!(PersonName::new(&"a".repeat(101), "first_name").is_err());
        assert!(PersonName::new(&"ñ".repeat(100), "first_name").is_ok());
    }
}
