//! Shared Kernel
//!
//! Vocabulary every backend crate agrees on:
//! - [`error`]: `AppError`, `ErrorKind` and the RFC 7807 rendering
//! - [`id`]: typed UUID wrappers for every persisted record
//! - [`rut`]: Chilean RUT validation, the identity key for staff and players
//!
//! Database and HTTP glue sit behind the `sqlx` and `axum` features so the
//! RUT validator stays usable without either.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod rut;
