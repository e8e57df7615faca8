//! Post-Match Checklist Entity
//!
//! Filed by the medical staff for each called-up player after a match.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ChecklistId, MatchId, PlayerId};

use crate::domain::choices::{PainIntensity, PainMechanism, PainOnset, PainZone};

#[derive(Debug, Clone)]
pub struct Checklist {
    pub checklist_id: ChecklistId,
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub filed_by: Option<AccountId>,
    pub pain: bool,
    pub pain_detail: PainDetail,
    pub presumptive_diagnosis: Option<String>,
    pub immediate_treatment: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields that only make sense when the player reported pain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PainDetail {
    pub intensity: Option<PainIntensity>,
    pub mechanism: Option<PainMechanism>,
    pub onset: Option<PainOnset>,
    pub zone: Option<PainZone>,
}

impl Checklist {
    /// Set the pain flag; without pain the detail is cleared
    pub fn set_pain(&mut self, pain: bool, detail: PainDetail) {
        self.pain = pain;
        self.pain_detail = if pain { detail } else { PainDetail::default() };
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
