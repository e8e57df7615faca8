//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{account::Account, auth_session::AuthSession, credential::Credential};
pub use repository::{AccountRepository, AuthSessionRepository, AuthStore, CredentialRepository};
pub use value_object::{
    AccountId, account_status::AccountStatus, public_id::PublicId, staff_role::StaffRole,
};
