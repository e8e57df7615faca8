//! In-memory store for use case and router tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use kernel::rut::Rut;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{account::Account, auth_session::AuthSession, credential::Credential};
use crate::domain::repository::{AccountRepository, AuthSessionRepository, CredentialRepository};
use crate::domain::value_object::{AccountId, public_id::PublicId};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    credentials: HashMap<AccountId, Credential>,
    sessions: HashMap<Uuid, AuthSession>,
}

#[derive(Clone, Default)]
pub struct InMemoryAuthStore {
    state: Arc<Mutex<State>>,
    reject_credentials: bool,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose credential inserts fail, as a lost connection would
    pub fn rejecting_credentials() -> Self {
        Self {
            reject_credentials: true,
            ..Self::default()
        }
    }

    /// Seed an account without a credential (session and admin tests)
    pub fn insert_account(&self, account: &Account) {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.account_id, account.clone());
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    pub fn credential_of(&self, account_id: &AccountId) -> Option<Credential> {
        self.state.lock().unwrap().credentials.get(account_id).cloned()
    }

    pub fn insert_session(&self, session: AuthSession) {
        self.state
            .lock()
            .unwrap()
            .sessions
            .insert(session.session_id, session);
    }
}

impl AccountRepository for InMemoryAuthStore {
    async fn create_account(&self, account: &Account, credential: &Credential) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.accounts.values().any(|a| a.rut == account.rut) {
            return Err(AuthError::RutTaken);
        }
        if self.reject_credentials {
            return Err(AuthError::Internal("credential insert failed".into()));
        }
        state.accounts.insert(account.account_id, account.clone());
        state
            .credentials
            .insert(credential.account_id, credential.clone());
        Ok(())
    }

    async fn find_account_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.state.lock().unwrap().accounts.get(account_id).cloned())
    }

    async fn find_account_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> AuthResult<Option<Account>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|a| &a.public_id == public_id)
            .cloned())
    }

    async fn find_account_by_rut(&self, rut: &Rut) -> AuthResult<Option<Account>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|a| &a.rut == rut)
            .cloned())
    }

    async fn rut_exists(&self, rut: &Rut) -> AuthResult<bool> {
        Ok(self.find_account_by_rut(rut).await?.is_some())
    }

    async fn list_accounts(&self) -> AuthResult<Vec<Account>> {
        let mut accounts: Vec<_> = self.state.lock().unwrap().accounts.values().cloned().collect();
        accounts.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(accounts)
    }

    async fn update_account(&self, account: &Account) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.account_id, account.clone());
        Ok(())
    }
}

impl CredentialRepository for InMemoryAuthStore {
    async fn find_credential(&self, account_id: &AccountId) -> AuthResult<Option<Credential>> {
        Ok(self.credential_of(account_id))
    }

    async fn update_credential(&self, credential: &Credential) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .credentials
            .insert(credential.account_id, credential.clone());
        Ok(())
    }
}

impl AuthSessionRepository for InMemoryAuthStore {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        self.insert_session(session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        Ok(self.state.lock().unwrap().sessions.get(&session_id).cloned())
    }

    async fn update_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.sessions.get_mut(&session.session_id) {
            *existing = session.clone();
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        self.state.lock().unwrap().sessions.remove(&session_id);
        Ok(())
    }

    async fn delete_sessions_for_account(&self, account_id: &AccountId) -> AuthResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| &s.account_id != account_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let now = Utc::now();
        let mut state = self.state.lock().unwrap();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at > now);
        Ok((before - state.sessions.len()) as u64)
    }
}

pub fn test_config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::development())
}
