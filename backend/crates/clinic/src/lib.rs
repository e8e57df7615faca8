//! Clinic Backend Module
//!
//! Clinical records of the club's players, kept by the medical staff:
//! divisions, players, kinesiology treatments, injuries with their daily
//! rehabilitation log, medical file attachments, matches with call-ups and
//! post-match checklists.
//!
//! Same layering as `auth`:
//! - `domain/` - Entities, choice lists, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every route expects the `auth` session middleware in front of it. Any
//! role may read; only Admin and Medical may write.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub(crate) mod testing;

pub use application::config::ClinicConfig;
pub use domain::repository::ClinicStore;
pub use error::{ClinicError, ClinicResult};
pub use infra::postgres::PgClinicRepository;
pub use presentation::router::clinic_router;
