//! Register Use Case
//!
//! Creates a staff account keyed by the canonical RUT. Public registration
//! always yields a `Medical` account; administrators choose the role.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    account::{Account, NewAccount},
    credential::Credential,
};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, public_id::PublicId, staff_role::StaffRole,
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub phone: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub public_id: PublicId,
    /// Canonical RUT
    pub rut: String,
    pub role: StaffRole,
}

pub struct RegisterUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: AuthStore> RegisterUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Public self-registration
    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if !self.config.allow_self_registration {
            return Err(AuthError::InsufficientRole);
        }
        self.register(input, StaffRole::default()).await
    }

    /// Registration performed by an administrator, with an explicit role
    pub async fn execute_by_admin(
        &self,
        input: RegisterInput,
        role: StaffRole,
    ) -> AuthResult<RegisterOutput> {
        self.register(input, role).await
    }

    async fn register(&self, input: RegisterInput, role: StaffRole) -> AuthResult<RegisterOutput> {
        let rut = self.config.rut.validate(&input.rut)?;
        let first_name = PersonName::new(&input.first_name, "first_name")?;
        let last_name = PersonName::new(&input.last_name, "last_name")?;
        let email = Email::parse_optional(input.email.as_deref())?;

        if input.password != input.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        let password = ClearTextPassword::new(input.password)?;
        password.ensure_not_similar([rut.body(), first_name.as_str(), last_name.as_str()])?;

        if self.repo.rut_exists(&rut).await? {
            return Err(AuthError::RutTaken);
        }

        let password_hash = password.hash(self.config.pepper())?;

        let account = Account::new(NewAccount {
            rut,
            first_name,
            last_name,
            email,
            role,
            phone: clean_optional(input.phone),
            position: clean_optional(input.position),
        });
        let credential = Credential::new(account.account_id, password_hash);

        self.repo.create_account(&account, &credential).await?;

        tracing::info!(
            public_id = %account.public_id,
            rut = %account.rut,
            role = %account.role,
            "Account registered"
        );

        Ok(RegisterOutput {
            public_id: account.public_id,
            rut: account.rut.canonical(),
            role: account.role,
        })
    }
}

/// Trim; blank becomes `None`
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
