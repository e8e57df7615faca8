//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Staff registration and login keyed by Chilean RUT (any common style)
//! - Server-side sessions with HMAC-signed bearer tokens / cookies
//! - Role-based access (Admin, Medical, Technical, Management)
//! - Account administration for admins
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Automatic lockout after failed login attempts
//! - Disabling an account closes all its sessions

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::current_user::CurrentUser;
pub use domain::repository::AuthStore;
pub use domain::value_object::staff_role::StaffRole;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
