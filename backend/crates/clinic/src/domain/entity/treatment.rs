//! Kinesiology Treatment Entity
//!
//! One attendance of a player by a professional.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PlayerId, TreatmentId};

use crate::domain::choices::TreatmentStatus;

#[derive(Debug, Clone)]
pub struct Treatment {
    pub treatment_id: TreatmentId,
    pub player_id: PlayerId,
    /// Staff account in charge; `None` once the account is gone
    pub professional_id: Option<AccountId>,
    pub attended_at: DateTime<Utc>,
    pub reason: String,
    pub procedures: String,
    pub status: TreatmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Treatment {
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
