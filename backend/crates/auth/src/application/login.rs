//! Login Use Case
//!
//! Authenticates an account by RUT + password and creates a session.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token::sign_session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{public_id::PublicId, staff_role::StaffRole};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    /// RUT in any common style
    pub rut: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    /// Signed bearer token, also sent as the session cookie
    pub session_token: String,
    pub public_id: PublicId,
    pub role: StaffRole,
    pub expires_in_secs: i64,
}

pub struct LoginUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: AuthStore> LoginUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput, client: ClientInfo) -> AuthResult<LoginOutput> {
        // A malformed RUT is reported as such, not as bad credentials
        let rut = self.config.rut.validate(&input.rut)?;

        let mut account = self
            .repo
            .find_account_by_rut(&rut)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let mut credential = self
            .repo
            .find_credential(&account.account_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credential not found".to_string()))?;

        if credential.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        if !account.status.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let password = ClearTextPassword::for_verification(input.password);
        if !credential.password_hash.verify(&password, self.config.pepper()) {
            credential.record_failure();
            self.repo.update_credential(&credential).await?;
            tracing::warn!(
                public_id = %account.public_id,
                failures = credential.login_failed_count,
                "Login failed"
            );
            return Err(if credential.is_locked() {
                AuthError::AccountLocked
            } else {
                AuthError::InvalidCredentials
            });
        }

        if credential.login_failed_count > 0 {
            credential.reset_failures();
            self.repo.update_credential(&credential).await?;
        }

        account.record_login();
        self.repo.update_account(&account).await?;

        let session = AuthSession::new(
            account.account_id,
            client.ip_string(),
            client.user_agent,
            self.config.session_ttl_chrono(),
        );
        self.repo.create_session(&session).await?;

        tracing::info!(
            public_id = %account.public_id,
            session_id = %session.session_id,
            role = %account.role,
            "Account logged in"
        );

        Ok(LoginOutput {
            session_token: sign_session_token(&self.config.session_secret, session.session_id),
            public_id: account.public_id,
            role: account.role,
            expires_in_secs: session.remaining_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::AccountRepository;
    use crate::application::register::{RegisterInput, RegisterUseCase};
    use crate::domain::entity::credential::Credential;
    use crate::domain::value_object::account_status::AccountStatus;
    use crate::testing::{InMemoryAuthStore, test_config};

    const PASSWORD: &str = "Rodilla-Izquierda-9";

    async fn setup() -> (Arc<InMemoryAuthStore>, LoginUseCase<InMemoryAuthStore>) {
        let repo = Arc::new(InMemoryAuthStore::new());
        let config = test_config();
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(RegisterInput {
                rut: "12.345.678-5".to_string(),
                first_name: "Pedro".to_string(),
                last_name: "Soto".to_string(),
                email: None,
                password: PASSWORD.to_string(),
                password_confirm: PASSWORD.to_string(),
                phone: None,
                position: None,
            })
            .await
            .unwrap();
        (repo.clone(), LoginUseCase::new(repo, config))
    }

    fn login(rut: &str, password: &str) -> LoginInput {
        LoginInput {
            rut: rut.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_with_any_rut_style() {
        let (repo, uc) = setup().await;
        for style in ["12.345.678-5", "12345678-5", "123456785"] {
            let out = uc.execute(login(style, PASSWORD), ClientInfo::default()).await.unwrap();
            assert!(out.session_token.contains('.'));
            assert_eq!(out.role, StaffRole::Medical);
        }
        assert_eq!(repo.session_count(), 3);
    }

    #[tokio::test]
    async fn test_login_invalid_rut_is_bad_request() {
        let (_repo, uc) = setup().await;
        let err = uc
            .execute(login("12.345.678-9", PASSWORD), ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_login_unknown_rut_and_wrong_password() {
        let (_repo, uc) = setup().await;
        let err = uc
            .execute(login("7654321-6", PASSWORD), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = uc
            .execute(login("12345678-5", "wrong-password"), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_lockout_after_repeated_failures() {
        let (_repo, uc) = setup().await;
        for _ in 0..Credential::MAX_LOGIN_FAILURES - 1 {
            let err = uc
                .execute(login("12345678-5", "nope-nope-nope"), ClientInfo::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
        let err = uc
            .execute(login("12345678-5", "nope-nope-nope"), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountLocked));

        // correct password is refused while locked
        let err = uc
            .execute(login("12345678-5", PASSWORD), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountLocked));
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_login() {
        let (repo, uc) = setup().await;
        let rut = kernel::rut::validate("12345678-5").unwrap();
        let mut account = repo.find_account_by_rut(&rut).await.unwrap().unwrap();
        account.set_status(AccountStatus::Disabled);
        repo.update_account(&account).await.unwrap();

        let err = uc
            .execute(login("12345678-5", PASSWORD), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled));
    }

    #[tokio::test]
    async fn test_success_resets_failures() {
        let (repo, uc) = setup().await;
        let _ = uc
            .execute(login("12345678-5", "nope-nope-nope"), ClientInfo::default())
            .await;
        uc.execute(login("12345678-5", PASSWORD), ClientInfo::default())
            .await
            .unwrap();

        let rut = kernel::rut::validate("12345678-5").unwrap();
        let account = repo.find_account_by_rut(&rut).await.unwrap().unwrap();
        assert_eq!(repo.credential_of(&account.account_id).unwrap().login_failed_count, 0);
        assert!(account.last_login_at.is_some());
    }
}
