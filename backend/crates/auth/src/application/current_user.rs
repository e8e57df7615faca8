//! Authenticated caller, resolved once per request by the session middleware

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::value_object::{AccountId, public_id::PublicId, staff_role::StaffRole};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(skip)]
    pub account_id: AccountId,
    pub public_id: PublicId,
    /// Canonical RUT
    pub rut: String,
    pub full_name: String,
    pub role: StaffRole,
    #[serde(skip)]
    pub session_id: Uuid,
}

impl CurrentUser {
    pub fn from_account(account: &Account, session_id: Uuid) -> Self {
        Self {
            account_id: account.account_id,
            public_id: account.public_id,
            rut: account.rut.canonical(),
            full_name: account.full_name(),
            role: account.role,
            session_id,
        }
    }

    pub fn can_write(&self) -> bool {
        self.role.can_write()
    }

    pub fn is_admin(&self) -> bool {
        self.role.can_manage_users()
    }

    /// `InsufficientRole` unless the role may modify clinical data
    pub fn ensure_can_write(&self) -> AuthResult<()> {
        if self.can_write() {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole)
        }
    }

    pub fn ensure_admin(&self) -> AuthResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole)
        }
    }
}
