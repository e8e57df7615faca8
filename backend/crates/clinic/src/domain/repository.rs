//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Method names are distinct across traits because a single store type
//! implements all of them.

use chrono::NaiveDate;
use kernel::id::{
    AccountId, ChecklistId, DivisionId, InjuryId, MatchId, MedicalFileId, PlayerId, TreatmentId,
};
use kernel::rut::Rut;

use crate::domain::choices::{FileKind, InjuryType, TreatmentStatus};
use crate::domain::entity::{
    checklist::Checklist,
    division::{Division, DivisionSummary},
    injury::{Injury, InjuryDailyStatus},
    matches::Match,
    medical_file::MedicalFile,
    player::Player,
    treatment::Treatment,
};
use crate::error::ClinicResult;

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    pub division_id: Option<DivisionId>,
    pub active: Option<bool>,
    /// Case-insensitive match on RUT, names or record number
    pub search: Option<String>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        if self.division_id.is_some() && player.division_id != self.division_id {
            return false;
        }
        if self.active.is_some_and(|a| a != player.is_active) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                player.first_names.to_lowercase().contains(&term)
                    || player.last_names.to_lowercase().contains(&term)
                    || player.record_number.to_lowercase().contains(&term)
                    || player.rut.canonical().to_lowercase().contains(&term)
                    || self.rut_term().is_some_and(|rut_term| {
                        player.rut.canonical().replace('-', "").contains(&rut_term)
                    })
            }
        }
    }

    /// Normalized RUT fragment, only when the term is written like a RUT
    /// (digits, `k`, dots, hyphens and spaces). Name searches never reach
    /// the RUT comparison.
    pub fn rut_term(&self) -> Option<String> {
        let term = self.search_term()?;
        let rut_like = term
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, 'k' | '.' | '-') || c.is_whitespace());
        if !rut_like {
            return None;
        }
        Some(kernel::rut::normalize(&term)).filter(|t| !t.is_empty())
    }

    /// Trimmed, lowercased search term; `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreatmentFilter {
    pub player_id: Option<PlayerId>,
    pub professional_id: Option<AccountId>,
    pub status: Option<TreatmentStatus>,
}

impl TreatmentFilter {
    pub fn matches(&self, t: &Treatment) -> bool {
        self.player_id.is_none_or(|p| p == t.player_id)
            && (self.professional_id.is_none() || self.professional_id == t.professional_id)
            && self.status.is_none_or(|s| s == t.status)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InjuryFilter {
    pub player_id: Option<PlayerId>,
    pub injury_type: Option<InjuryType>,
    pub active: Option<bool>,
}

impl InjuryFilter {
    pub fn matches(&self, i: &Injury) -> bool {
        self.player_id.is_none_or(|p| p == i.player_id)
            && self.injury_type.is_none_or(|t| t == i.injury_type)
            && self.active.is_none_or(|a| a == i.is_active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MedicalFileFilter {
    pub player_id: Option<PlayerId>,
    pub kind: Option<FileKind>,
}

impl MedicalFileFilter {
    pub fn matches(&self, f: &MedicalFile) -> bool {
        self.player_id.is_none_or(|p| p == f.player_id) && self.kind.is_none_or(|k| k == f.kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl MatchFilter {
    pub fn matches(&self, m: &Match) -> bool {
        self.from.is_none_or(|d| m.date >= d) && self.to.is_none_or(|d| m.date <= d)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChecklistFilter {
    pub player_id: Option<PlayerId>,
    pub match_id: Option<MatchId>,
    pub pain: Option<bool>,
}

impl ChecklistFilter {
    pub fn matches(&self, c: &Checklist) -> bool {
        self.player_id.is_none_or(|p| p == c.player_id)
            && self.match_id.is_none_or(|m| m == c.match_id)
            && self.pain.is_none_or(|p| p == c.pain)
    }
}

// ============================================================================
// Repositories
// ============================================================================

#[trait_variant::make(DivisionRepository: Send)]
pub trait LocalDivisionRepository {
    async fn create_division(&self, division: &Division) -> ClinicResult<()>;

    async fn find_division(&self, division_id: &DivisionId) -> ClinicResult<Option<Division>>;

    /// Ordered by name, with active player counts
    async fn list_divisions(&self) -> ClinicResult<Vec<DivisionSummary>>;

    async fn update_division(&self, division: &Division) -> ClinicResult<()>;

    /// Players of the division are left without one
    async fn delete_division(&self, division_id: &DivisionId) -> ClinicResult<bool>;
}

#[trait_variant::make(PlayerRepository: Send)]
pub trait LocalPlayerRepository {
    async fn create_player(&self, player: &Player) -> ClinicResult<()>;

    async fn find_player(&self, player_id: &PlayerId) -> ClinicResult<Option<Player>>;

    async fn find_player_by_rut(&self, rut: &Rut) -> ClinicResult<Option<Player>>;

    async fn record_number_taken(
        &self,
        number: &str,
        except: Option<&PlayerId>,
    ) -> ClinicResult<bool>;

    /// Largest purely numeric record number, 0 when there is none
    async fn max_record_number(&self) -> ClinicResult<u64>;

    /// Ordered by last names then first names
    async fn list_players(&self, filter: &PlayerFilter) -> ClinicResult<Vec<Player>>;

    /// The subset of `ids` that exist
    async fn existing_player_ids(&self, ids: &[PlayerId]) -> ClinicResult<Vec<PlayerId>>;

    async fn update_player(&self, player: &Player) -> ClinicResult<()>;

    /// Cascades to every clinical record of the player
    async fn delete_player(&self, player_id: &PlayerId) -> ClinicResult<bool>;
}

#[trait_variant::make(TreatmentRepository: Send)]
pub trait LocalTreatmentRepository {
    async fn create_treatment(&self, treatment: &Treatment) -> ClinicResult<()>;

    async fn find_treatment(&self, treatment_id: &TreatmentId) -> ClinicResult<Option<Treatment>>;

    /// Newest first
    async fn list_treatments(&self, filter: &TreatmentFilter) -> ClinicResult<Vec<Treatment>>;

    async fn update_treatment(&self, treatment: &Treatment) -> ClinicResult<()>;

    async fn delete_treatment(&self, treatment_id: &TreatmentId) -> ClinicResult<bool>;
}

#[trait_variant::make(InjuryRepository: Send)]
pub trait LocalInjuryRepository {
    async fn create_injury(&self, injury: &Injury) -> ClinicResult<()>;

    async fn find_injury(&self, injury_id: &InjuryId) -> ClinicResult<Option<Injury>>;

    /// Most recent injury date first
    async fn list_injuries(&self, filter: &InjuryFilter) -> ClinicResult<Vec<Injury>>;

    async fn update_injury(&self, injury: &Injury) -> ClinicResult<()>;

    async fn delete_injury(&self, injury_id: &InjuryId) -> ClinicResult<bool>;

    async fn create_daily_status(&self, status: &InjuryDailyStatus) -> ClinicResult<()>;

    async fn daily_status_exists(&self, injury_id: &InjuryId, date: NaiveDate)
    -> ClinicResult<bool>;

    /// Most recent day first
    async fn list_daily_statuses(&self, injury_id: &InjuryId)
    -> ClinicResult<Vec<InjuryDailyStatus>>;
}

#[trait_variant::make(MedicalFileRepository: Send)]
pub trait LocalMedicalFileRepository {
    async fn create_medical_file(&self, file: &MedicalFile) -> ClinicResult<()>;

    async fn find_medical_file(&self, file_id: &MedicalFileId)
    -> ClinicResult<Option<MedicalFile>>;

    /// Most recent document date first
    async fn list_medical_files(&self, filter: &MedicalFileFilter)
    -> ClinicResult<Vec<MedicalFile>>;

    async fn delete_medical_file(&self, file_id: &MedicalFileId) -> ClinicResult<bool>;
}

#[trait_variant::make(MatchRepository: Send)]
pub trait LocalMatchRepository {
    /// Stores the match with its call-ups
    async fn create_match(&self, m: &Match) -> ClinicResult<()>;

    async fn find_match(&self, match_id: &MatchId) -> ClinicResult<Option<Match>>;

    /// Most recent first
    async fn list_matches(&self, filter: &MatchFilter) -> ClinicResult<Vec<Match>>;

    /// Date, opponent and venue
    async fn update_match(&self, m: &Match) -> ClinicResult<()>;

    /// Replace the call-up list
    async fn set_call_ups(&self, match_id: &MatchId, players: &[PlayerId]) -> ClinicResult<()>;

    /// Players called up, ordered like `list_players`
    async fn list_call_up_players(&self, match_id: &MatchId) -> ClinicResult<Vec<Player>>;

    async fn delete_match(&self, match_id: &MatchId) -> ClinicResult<bool>;
}

#[trait_variant::make(ChecklistRepository: Send)]
pub trait LocalChecklistRepository {
    async fn create_checklist(&self, checklist: &Checklist) -> ClinicResult<()>;

    async fn find_checklist(&self, checklist_id: &ChecklistId) -> ClinicResult<Option<Checklist>>;

    async fn find_checklist_for(
        &self,
        player_id: &PlayerId,
        match_id: &MatchId,
    ) -> ClinicResult<Option<Checklist>>;

    /// Newest match first
    async fn list_checklists(&self, filter: &ChecklistFilter) -> ClinicResult<Vec<Checklist>>;

    async fn update_checklist(&self, checklist: &Checklist) -> ClinicResult<()>;

    async fn delete_checklist(&self, checklist_id: &ChecklistId) -> ClinicResult<bool>;
}

/// Everything the clinic use cases need from persistence
pub trait ClinicStore:
    DivisionRepository
    + PlayerRepository
    + TreatmentRepository
    + InjuryRepository
    + MedicalFileRepository
    + MatchRepository
    + ChecklistRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ClinicStore for T where
    T: DivisionRepository
        + PlayerRepository
        + TreatmentRepository
        + InjuryRepository
        + MedicalFileRepository
        + MatchRepository
        + ChecklistRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
