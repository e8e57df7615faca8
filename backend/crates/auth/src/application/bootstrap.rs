//! Initial administrator
//!
//! On a fresh database nobody can log in to create the first admin, so the
//! binary may seed one from the environment at startup.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::staff_role::StaffRole;
use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    /// Existing account raised to Admin
    Promoted,
    Unchanged,
}

pub struct BootstrapAdminUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: AuthStore> BootstrapAdminUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, rut: &str, password: &str) -> AuthResult<BootstrapOutcome> {
        let canonical = self.config.rut.validate(rut)?;

        if let Some(mut account) = self.repo.find_account_by_rut(&canonical).await? {
            if account.role == StaffRole::Admin {
                return Ok(BootstrapOutcome::Unchanged);
            }
            account.set_role(StaffRole::Admin);
            self.repo.update_account(&account).await?;
            tracing::warn!(public_id = %account.public_id, "Existing account promoted to admin");
            return Ok(BootstrapOutcome::Promoted);
        }

        RegisterUseCase::new(self.repo.clone(), self.config.clone())
            .execute_by_admin(
                RegisterInput {
                    rut: rut.to_string(),
                    first_name: "Administrador".to_string(),
                    last_name: "Clínica".to_string(),
                    email: None,
                    password: password.to_string(),
                    password_confirm: password.to_string(),
                    phone: None,
                    position: None,
                },
                StaffRole::Admin,
            )
            .await?;

        tracing::info!(rut = %canonical, "Bootstrap admin created");
        Ok(BootstrapOutcome::Created)
    }
}
