//! Staff contact email
//!
//! Optional on a profile: the RUT is the login key, so blank input means
//! "no email" rather than an error.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// RFC 5321 path limit
const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Trimmed, lowercased and checked
    pub fn new(raw: &str) -> AppResult<Self> {
        let email = raw.trim().to_lowercase();
        check(&email)
            .map_err(|reason| AppError::bad_request(reason).with_field("email"))?;
        Ok(Self(email))
    }

    /// Blank or missing input is `Ok(None)`
    pub fn parse_optional(raw: Option<&str>) -> AppResult<Option<Self>> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Self::new(s).map(Some),
            None => Ok(None),
        }
    }

    /// Stored values were checked on the way in
    pub fn from_db(email: String) -> Self {
        Self(email)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn check(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email cannot be empty");
    }
    if email.len() > MAX_LEN {
        return Err("Email must be at most 254 characters");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain @");
    };
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return Err("Invalid email address before @");
    }
    let labels_ok = domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if !labels_ok {
        return Err("Invalid email domain");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_club_addresses() {
        assert!(Email::new("kine@club.cl").is_ok());
        assert!(Email::new("medico.jefe@club.co.cl").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
        assert_eq!(Email::new(" Kine@Club.CL ").unwrap().as_str(), "kine@club.cl");
    }

    #[test]
    fn test_rejections_are_scoped_to_email() {
        for bad in [
            "userexample.com",
            "user@",
            "@example.com",
            "user@@example.com",
            "user@example",
            "user@-club.cl",
            "user@club..cl",
        ] {
            let err = Email::new(bad).unwrap_err();
            assert_eq!(err.field(), Some("email"), "{bad}");
        }
    }

    #[test]
    fn test_optional() {
        assert_eq!(Email::parse_optional(None).unwrap(), None);
        assert_eq!(Email::parse_optional(Some("   ")).unwrap(), None);
        assert!(Email::parse_optional(Some("kine@club.cl")).unwrap().is_some());
        assert!(Email::parse_optional(Some("nope")).is_err());
    }
}
