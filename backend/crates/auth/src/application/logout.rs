//! Logout Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::parse_session_token;
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;

pub struct LogoutUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: AuthStore> LogoutUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Delete the session behind `token`; unknown or forged tokens are a no-op
    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let Ok(session_id) = parse_session_token(&self.config.session_secret, token) else {
            return Ok(());
        };

        self.repo.delete_session(session_id).await?;
        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }
}
