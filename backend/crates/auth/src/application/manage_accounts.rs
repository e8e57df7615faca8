//! Account Administration Use Case
//!
//! Listing, reading and updating staff accounts. Callers must be admins.

use std::sync::Arc;

use crate::application::current_user::CurrentUser;
use crate::application::register::clean_optional;
use crate::domain::entity::account::Account;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{
    account_status::AccountStatus, email::Email, person_name::PersonName, public_id::PublicId,
    staff_role::StaffRole,
};
use crate::error::{AuthError, AuthResult};

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Default)]
pub struct UpdateAccountInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some("")` clears the email
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub role: Option<StaffRole>,
    pub status: Option<AccountStatus>,
}

pub struct ManageAccountsUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> ManageAccountsUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, actor: &CurrentUser) -> AuthResult<Vec<Account>> {
        actor.ensure_admin()?;
        self.repo.list_accounts().await
    }

    pub async fn get(&self, actor: &CurrentUser, public_id: &PublicId) -> AuthResult<Account> {
        actor.ensure_admin()?;
        self.find(public_id).await
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        public_id: &PublicId,
        input: UpdateAccountInput,
    ) -> AuthResult<Account> {
        actor.ensure_admin()?;
        let mut account = self.find(public_id).await?;

        if account.account_id == actor.account_id {
            let demoted = input.role.is_some_and(|r| !r.can_manage_users());
            let disabled = input.status.is_some_and(|s| !s.can_login());
            if demoted || disabled {
                return Err(AuthError::SelfLockout);
            }
        }

        if let Some(first_name) = input.first_name {
            account.first_name = PersonName::new(&first_name, "first_name")?;
        }
        if let Some(last_name) = input.last_name {
            account.last_name = PersonName::new(&last_name, "last_name")?;
        }
        if let Some(email) = input.email {
            account.email = Email::parse_optional(Some(&email))?;
        }
        if input.phone.is_some() {
            account.phone = clean_optional(input.phone);
        }
        if input.position.is_some() {
            account.position = clean_optional(input.position);
        }
        if let Some(role) = input.role {
            account.set_role(role);
        }

        let newly_disabled = match input.status {
            Some(status) => {
                let was_active = account.status.can_login();
                account.set_status(status);
                was_active && !status.can_login()
            }
            None => false,
        };

        account.touch();
        self.repo.update_account(&account).await?;

        if newly_disabled {
            let closed = self
                .repo
                .delete_sessions_for_account(&account.account_id)
                .await?;
            tracing::info!(public_id = %account.public_id, sessions = closed, "Account disabled");
        }

        tracing::info!(
            public_id = %account.public_id,
            by = %actor.public_id,
            role = %account.role,
            status = %account.status,
            "Account updated"
        );

        Ok(account)
    }

    async fn find(&self, public_id: &PublicId) -> AuthResult<Account> {
        self.repo
            .find_account_by_public_id(public_id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }
}
