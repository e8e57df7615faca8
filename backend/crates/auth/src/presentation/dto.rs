//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;
use crate::domain::value_object::{account_status::AccountStatus, staff_role::StaffRole};

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

/// Admin-side registration: explicit role and profile fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterRequest {
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub role: StaffRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub public_id: String,
    pub rut: String,
    pub role: StaffRole,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Any common style: `12.345.678-5`, `12345678-5`, `123456785`
    pub rut: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub public_id: String,
    pub role: StaffRole,
}

// ============================================================================
// Session Status
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub public_id: Option<String>,
    pub role: Option<StaffRole>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionStatusResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            public_id: None,
            role: None,
            expires_at: None,
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub public_id: String,
    pub rut: String,
    /// `19.976.194-3` style, for display
    pub rut_formatted: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: StaffRole,
    pub role_label: &'static str,
    pub status: AccountStatus,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            public_id: account.public_id.to_string(),
            rut: account.rut.canonical(),
            rut_formatted: account.rut.formatted(),
            first_name: account.first_name.to_string(),
            last_name: account.last_name.to_string(),
            full_name: account.full_name(),
            email: account.email.as_ref().map(|e| e.to_string()),
            role: account.role,
            role_label: account.role.label(),
            status: account.status,
            phone: account.phone.clone(),
            position: account.position.clone(),
            last_login_at: account.last_login_at,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub role: Option<StaffRole>,
    pub status: Option<AccountStatus>,
}
