//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Method names are distinct across traits because a single store type
//! implements all of them.

use crate::domain::entity::{account::Account, auth_session::AuthSession, credential::Credential};
use crate::domain::value_object::{AccountId, public_id::PublicId};
use crate::error::AuthResult;
use kernel::rut::Rut;
use uuid::Uuid;

#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert the account together with its credential; neither row is
    /// stored when either insert fails
    async fn create_account(&self, account: &Account, credential: &Credential)
    -> AuthResult<()>;

    async fn find_account_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    async fn find_account_by_public_id(&self, public_id: &PublicId)
    -> AuthResult<Option<Account>>;

    /// Lookup by canonical RUT
    async fn find_account_by_rut(&self, rut: &Rut) -> AuthResult<Option<Account>>;

    async fn rut_exists(&self, rut: &Rut) -> AuthResult<bool>;

    /// All accounts, ordered by last name then first name
    async fn list_accounts(&self) -> AuthResult<Vec<Account>>;

    async fn update_account(&self, account: &Account) -> AuthResult<()>;
}

#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn find_credential(&self, account_id: &AccountId) -> AuthResult<Option<Credential>>;

    async fn update_credential(&self, credential: &Credential) -> AuthResult<()>;
}

#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()>;

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    /// Update last activity
    async fn update_session(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete every session of an account (on disable)
    async fn delete_sessions_for_account(&self, account_id: &AccountId) -> AuthResult<u64>;

    async fn cleanup_expired_sessions(&self) -> AuthResult<u64>;
}

/// Everything the auth use cases need from persistence
pub trait AuthStore:
    AccountRepository + CredentialRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: AccountRepository
        + CredentialRepository
        + AuthSessionRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
