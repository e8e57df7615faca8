//! Staff Role Value Object
//!
//! Every account belongs to exactly one area of the club staff. The role
//! decides what the account may do with clinical data:
//!
//! | Role         | Read | Write | Manage users |
//! |--------------|------|-------|--------------|
//! | `Admin`      | yes  | yes   | yes          |
//! | `Medical`    | yes  | yes   | no           |
//! | `Technical`  | yes  | no    | no           |
//! | `Management` | yes  | no    | no           |

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum StaffRole {
    #[display("admin")]
    Admin = 0,
    #[default]
    #[display("medical")]
    Medical = 1,
    #[display("technical")]
    Technical = 2,
    #[display("management")]
    Management = 3,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Admin,
        StaffRole::Medical,
        StaffRole::Technical,
        StaffRole::Management,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Medical => "medical",
            StaffRole::Technical => "technical",
            StaffRole::Management => "management",
        }
    }

    /// Spanish label shown in the staff UI
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            StaffRole::Admin => "Administrador",
            StaffRole::Medical => "Cuerpo médico",
            StaffRole::Technical => "Cuerpo técnico",
            StaffRole::Management => "Dirigencia",
        }
    }

    #[inline]
    pub const fn can_read(&self) -> bool {
        true
    }

    /// Create, update and delete clinical records
    #[inline]
    pub const fn can_write(&self) -> bool {
        matches!(self, StaffRole::Admin | StaffRole::Medical)
    }

    #[inline]
    pub const fn can_manage_users(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions() {
        assert!(StaffRole::Admin.can_write());
        assert!(StaffRole::Admin.can_manage_users());
        assert!(StaffRole::Medical.can_write());
        assert!(!StaffRole::Medical.can_manage_users());
        assert!(!StaffRole::Technical.can_write());
        assert!(!StaffRole::Management.can_write());
        assert!(StaffRole::ALL.iter().all(|r| r.can_read()));
    }

    #[test]
    fn test_code_roundtrip() {
        for role in StaffRole::ALL {
            assert_eq!(StaffRole::from_code(role.code()), Some(role));
            assert_eq!(role.to_string(), role.code());
        }
        assert_eq!(StaffRole::from_code("super_admin"), None);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&StaffRole::Technical).unwrap();
        assert_eq!(json, "\"technical\"");
        let role: StaffRole = serde_json::from_str("\"management\"").unwrap();
        assert_eq!(role, StaffRole::Management);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StaffRole::Medical.label(), "Cuerpo médico");
        assert_eq!(StaffRole::default(), StaffRole::Medical);
    }
}
