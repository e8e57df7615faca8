//! Check Session Use Case
//!
//! Resolves a session token to the authenticated account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::current_user::CurrentUser;
use crate::application::token::parse_session_token;
use crate::domain::entity::{account::Account, auth_session::AuthSession};
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};

/// Result of a successful session check
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: AuthSession,
    pub account: Account,
}

impl SessionContext {
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser::from_account(&self.account, self.session.session_id)
    }
}

pub struct CheckSessionUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: AuthStore> CheckSessionUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Validate the token, load session and account, bump last activity
    pub async fn execute(&self, session_token: &str) -> AuthResult<SessionContext> {
        let session_id = parse_session_token(&self.config.session_secret, session_token)?;

        let mut session = self
            .repo
            .find_session(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.repo.delete_session(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let account = self
            .repo
            .find_account_by_id(&session.account_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if !account.status.can_login() {
            self.repo.delete_session(session_id).await?;
            return Err(AuthError::AccountDisabled);
        }

        session.touch();

        // activity tracking must not slow down every request
        let repo = self.repo.clone();
        let touched = session.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update_session(&touched).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(SessionContext { session, account })
    }
}
