//! Account Status Value Object
//!
//! Accounts are never deleted (treatments and checklists keep pointing at
//! the professional who filed them); an administrator disables them instead.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AccountStatus {
    #[default]
    Active = 0,
    Disabled = 1,
}

impl AccountStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }

    /// Check if login is allowed
    #[inline]
    pub const fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(Self::Active),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status() {
        assert!(AccountStatus::Active.can_login());
        assert!(!AccountStatus::Disabled.can_login());
        assert_eq!(AccountStatus::from_code("disabled"), Some(AccountStatus::Disabled));
        assert_eq!(AccountStatus::from_code("memorial"), None);
        assert_eq!(AccountStatus::default().to_string(), "active");
    }
}
