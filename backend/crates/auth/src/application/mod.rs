//! Application Layer
//!
//! Use cases and application services.

pub mod bootstrap;
pub mod check_session;
pub mod config;
pub mod current_user;
pub mod login;
pub mod logout;
pub mod manage_accounts;
pub mod register;
pub mod token;

// Re-exports
pub use bootstrap::{BootstrapAdminUseCase, BootstrapOutcome};
pub use check_session::{CheckSessionUseCase, SessionContext};
pub use config::AuthConfig;
pub use current_user::CurrentUser;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use manage_accounts::{ManageAccountsUseCase, UpdateAccountInput};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
