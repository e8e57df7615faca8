//! Account Entity
//!
//! A staff member of the club (physio, doctor, coach, board member). The
//! canonical RUT is both the unique key and the login name.

use chrono::{DateTime, Utc};
use kernel::rut::Rut;

use crate::domain::value_object::{
    AccountId, account_status::AccountStatus, email::Email, person_name::PersonName,
    public_id::PublicId, staff_role::StaffRole,
};

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    /// Public ID for API responses
    pub public_id: PublicId,
    pub rut: Rut,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Option<Email>,
    pub role: StaffRole,
    pub status: AccountStatus,
    pub phone: Option<String>,
    /// Job title inside the role ("Kinesiólogo", "Preparador físico", ...)
    pub position: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields collected at registration time
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub rut: Rut,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Option<Email>,
    pub role: StaffRole,
    pub phone: Option<String>,
    pub position: Option<String>,
}

impl Account {
    pub fn new(data: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            public_id: PublicId::new(),
            rut: data.rut,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            role: data.role,
            status: AccountStatus::Active,
            phone: data.phone,
            position: data.position,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn set_role(&mut self, role: StaffRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
