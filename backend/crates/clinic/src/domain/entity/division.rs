//! Division Entity
//!
//! A squad of the club ("Primer Equipo", "Femenino", "Cadetes Sub-17").

use chrono::{DateTime, Utc};
use kernel::id::DivisionId;

use crate::domain::text;
use crate::error::ClinicResult;

pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct Division {
    pub division_id: DivisionId,
    /// Unique
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Division {
    pub fn new(name: &str) -> ClinicResult<Self> {
        Ok(Self {
            division_id: DivisionId::new(),
            name: text::required(name, "name", MAX_NAME_LEN)?,
            created_at: Utc::now(),
        })
    }

    pub fn rename(&mut self, name: &str) -> ClinicResult<()> {
        self.name = text::required(name, "name", MAX_NAME_LEN)?;
        Ok(())
    }
}

/// Division plus the number of active players in it
#[derive(Debug, Clone)]
pub struct DivisionSummary {
    pub division: Division,
    pub active_players: i64,
}
