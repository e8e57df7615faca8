//! PostgreSQL Repository Implementations
//!
//! Choice fields are stored as their text codes. A code the domain does not
//! know is a data error and surfaces as an internal error.

mod checklists;
mod divisions;
mod injuries;
mod matches;
mod medical_files;
mod players;
mod treatments;

use sqlx::PgPool;

use crate::error::{ClinicError, ClinicResult};

/// PostgreSQL-backed clinic repository
#[derive(Clone)]
pub struct PgClinicRepository {
    pool: PgPool,
}

impl PgClinicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Decode a stored choice code
fn choice<T>(code: &str, column: &str, from_code: fn(&str) -> Option<T>) -> ClinicResult<T> {
    from_code(code).ok_or_else(|| ClinicError::Internal(format!("Invalid {column}: {code}")))
}

fn optional_choice<T>(
    code: Option<&str>,
    column: &str,
    from_code: fn(&str) -> Option<T>,
) -> ClinicResult<Option<T>> {
    code.map(|c| choice(c, column, from_code)).transpose()
}
