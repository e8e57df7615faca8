//! API DTOs (Data Transfer Objects)
//!
//! Choice fields travel as their codes with a Spanish `...Label` companion
//! on responses. Nullable fields of partial updates distinguish "absent"
//! (keep) from `null` (clear).

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{
    AccountId, ChecklistId, DivisionId, InjuryDailyStatusId, InjuryId, MatchId, MedicalFileId,
    PlayerId, TreatmentId,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::checklists::ChecklistContent;
use crate::application::injuries::{
    DailyStatusInput, FinishInjuryInput, InjuryInput, UpdateInjuryInput,
};
use crate::application::matches::{MatchInput, UpdateMatchInput};
use crate::application::players::{PlayerInput, UpdatePlayerInput};
use crate::application::treatments::{TreatmentInput, UpdateTreatmentInput};
use crate::domain::choices::{
    BodyRegion, DailyPhase, FileKind, HealthInsurance, InjuryCondition, InjuryMechanism,
    InjuryType, Laterality, PainIntensity, PainMechanism, PainOnset, PainZone, Severity,
    SportStage, TreatmentStatus, Venue,
};
use crate::domain::entity::checklist::{Checklist, PainDetail};
use crate::domain::entity::division::{Division, DivisionSummary};
use crate::domain::entity::injury::{DaysRemaining, Injury, InjuryDailyStatus};
use crate::domain::entity::matches::Match;
use crate::domain::entity::medical_file::MedicalFile;
use crate::domain::entity::player::Player;
use crate::domain::entity::treatment::Treatment;
use crate::domain::repository::{
    ChecklistFilter, InjuryFilter, MatchFilter, MedicalFileFilter, PlayerFilter, TreatmentFilter,
};

/// `null` becomes `Some(None)`; pair with `#[serde(default)]` so a missing
/// field stays `None`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Choices
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceResponse {
    pub code: &'static str,
    pub label: &'static str,
}

macro_rules! choice_list {
    ($ty:ty) => {
        <$ty>::ALL
            .iter()
            .map(|c| ChoiceResponse {
                code: c.code(),
                label: c.label(),
            })
            .collect()
    };
}

/// Every selectable list, for form dropdowns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicesResponse {
    pub laterality: Vec<ChoiceResponse>,
    pub health_insurance: Vec<ChoiceResponse>,
    pub treatment_status: Vec<ChoiceResponse>,
    pub injury_type: Vec<ChoiceResponse>,
    pub body_region: Vec<ChoiceResponse>,
    pub injury_mechanism: Vec<ChoiceResponse>,
    pub injury_condition: Vec<ChoiceResponse>,
    pub sport_stage: Vec<ChoiceResponse>,
    pub severity: Vec<ChoiceResponse>,
    pub daily_phase: Vec<ChoiceResponse>,
    pub file_kind: Vec<ChoiceResponse>,
    pub venue: Vec<ChoiceResponse>,
    pub pain_zone: Vec<ChoiceResponse>,
    pub pain_intensity: Vec<ChoiceResponse>,
    pub pain_mechanism: Vec<ChoiceResponse>,
    pub pain_onset: Vec<ChoiceResponse>,
}

impl ChoicesResponse {
    pub fn all() -> Self {
        Self {
            laterality: choice_list!(Laterality),
            health_insurance: choice_list!(HealthInsurance),
            treatment_status: choice_list!(TreatmentStatus),
            injury_type: choice_list!(InjuryType),
            body_region: choice_list!(BodyRegion),
            injury_mechanism: choice_list!(InjuryMechanism),
            injury_condition: choice_list!(InjuryCondition),
            sport_stage: choice_list!(SportStage),
            severity: choice_list!(Severity),
            daily_phase: choice_list!(DailyPhase),
            file_kind: choice_list!(FileKind),
            venue: choice_list!(Venue),
            pain_zone: choice_list!(PainZone),
            pain_intensity: choice_list!(PainIntensity),
            pain_mechanism: choice_list!(PainMechanism),
            pain_onset: choice_list!(PainOnset),
        }
    }
}

// ============================================================================
// Divisions
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DivisionRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponse {
    pub division_id: DivisionId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_players: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Division> for DivisionResponse {
    fn from(d: &Division) -> Self {
        Self {
            division_id: d.division_id,
            name: d.name.clone(),
            active_players: None,
            created_at: d.created_at,
        }
    }
}

impl From<&DivisionSummary> for DivisionResponse {
    fn from(s: &DivisionSummary) -> Self {
        Self {
            active_players: Some(s.active_players),
            ..Self::from(&s.division)
        }
    }
}

// ============================================================================
// Players
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub division_id: Option<DivisionId>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

impl From<PlayerQuery> for PlayerFilter {
    fn from(q: PlayerQuery) -> Self {
        Self {
            division_id: q.division_id,
            active: q.active,
            search: q.search,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    /// Any common style
    pub rut: String,
    pub first_names: String,
    pub last_names: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub nationality: Option<String>,
    pub laterality: Laterality,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<i32>,
    pub health_insurance: HealthInsurance,
    #[serde(default)]
    pub record_number: Option<String>,
    #[serde(default)]
    pub division_id: Option<DivisionId>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<CreatePlayerRequest> for PlayerInput {
    fn from(r: CreatePlayerRequest) -> Self {
        Self {
            rut: r.rut,
            first_names: r.first_names,
            last_names: r.last_names,
            birth_date: r.birth_date,
            nationality: r.nationality,
            laterality: r.laterality,
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            health_insurance: r.health_insurance,
            record_number: r.record_number,
            division_id: r.division_id,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    pub rut: Option<String>,
    pub first_names: Option<String>,
    pub last_names: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub laterality: Option<Laterality>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight_kg: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub height_cm: Option<Option<i32>>,
    pub health_insurance: Option<HealthInsurance>,
    pub record_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub division_id: Option<Option<DivisionId>>,
    pub is_active: Option<bool>,
}

impl From<UpdatePlayerRequest> for UpdatePlayerInput {
    fn from(r: UpdatePlayerRequest) -> Self {
        Self {
            rut: r.rut,
            first_names: r.first_names,
            last_names: r.last_names,
            birth_date: r.birth_date,
            nationality: r.nationality,
            laterality: r.laterality,
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            health_insurance: r.health_insurance,
            record_number: r.record_number,
            division_id: r.division_id,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub player_id: PlayerId,
    pub rut: String,
    pub rut_formatted: String,
    pub first_names: String,
    pub last_names: String,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub age: i32,
    pub nationality: String,
    pub laterality: Laterality,
    pub laterality_label: &'static str,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<i32>,
    pub health_insurance: HealthInsurance,
    pub health_insurance_label: &'static str,
    pub record_number: String,
    pub division_id: Option<DivisionId>,
    pub is_active: bool,
    /// Download route of the profile photo
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Player> for PlayerResponse {
    fn from(p: &Player) -> Self {
        Self {
            player_id: p.player_id,
            rut: p.rut.canonical(),
            rut_formatted: p.rut.formatted(),
            first_names: p.first_names.clone(),
            last_names: p.last_names.clone(),
            full_name: p.full_name(),
            birth_date: p.birth_date,
            age: p.age(),
            nationality: p.nationality.clone(),
            laterality: p.laterality,
            laterality_label: p.laterality.label(),
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            health_insurance: p.health_insurance,
            health_insurance_label: p.health_insurance.label(),
            record_number: p.record_number.clone(),
            division_id: p.division_id,
            is_active: p.is_active,
            photo_url: p
                .photo_path
                .as_ref()
                .map(|_| format!("/api/players/{}/photo", p.player_id)),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ============================================================================
// Treatments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentQuery {
    pub player_id: Option<PlayerId>,
    pub professional_id: Option<AccountId>,
    pub status: Option<TreatmentStatus>,
}

impl From<TreatmentQuery> for TreatmentFilter {
    fn from(q: TreatmentQuery) -> Self {
        Self {
            player_id: q.player_id,
            professional_id: q.professional_id,
            status: q.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreatmentRequest {
    pub player_id: PlayerId,
    #[serde(default)]
    pub attended_at: Option<DateTime<Utc>>,
    pub reason: String,
    pub procedures: String,
    pub status: TreatmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateTreatmentRequest> for TreatmentInput {
    fn from(r: CreateTreatmentRequest) -> Self {
        Self {
            player_id: r.player_id,
            attended_at: r.attended_at,
            reason: r.reason,
            procedures: r.procedures,
            status: r.status,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTreatmentRequest {
    pub attended_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub procedures: Option<String>,
    pub status: Option<TreatmentStatus>,
    /// `""` clears
    pub notes: Option<String>,
}

impl From<UpdateTreatmentRequest> for UpdateTreatmentInput {
    fn from(r: UpdateTreatmentRequest) -> Self {
        Self {
            attended_at: r.attended_at,
            reason: r.reason,
            procedures: r.procedures,
            status: r.status,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentResponse {
    pub treatment_id: TreatmentId,
    pub player_id: PlayerId,
    pub professional_id: Option<AccountId>,
    pub attended_at: DateTime<Utc>,
    pub reason: String,
    pub procedures: String,
    pub status: TreatmentStatus,
    pub status_label: &'static str,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Treatment> for TreatmentResponse {
    fn from(t: &Treatment) -> Self {
        Self {
            treatment_id: t.treatment_id,
            player_id: t.player_id,
            professional_id: t.professional_id,
            attended_at: t.attended_at,
            reason: t.reason.clone(),
            procedures: t.procedures.clone(),
            status: t.status,
            status_label: t.status.label(),
            notes: t.notes.clone(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

// ============================================================================
// Injuries
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryQuery {
    pub player_id: Option<PlayerId>,
    pub injury_type: Option<InjuryType>,
    pub active: Option<bool>,
}

impl From<InjuryQuery> for InjuryFilter {
    fn from(q: InjuryQuery) -> Self {
        Self {
            player_id: q.player_id,
            injury_type: q.injury_type,
            active: q.active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInjuryRequest {
    pub player_id: PlayerId,
    pub injured_on: NaiveDate,
    pub diagnosis: String,
    pub injury_type: InjuryType,
    pub body_region: BodyRegion,
    pub mechanism: InjuryMechanism,
    pub condition: InjuryCondition,
    pub sport_stage: SportStage,
    pub severity: Severity,
    #[serde(default)]
    pub estimated_recovery_days: Option<i32>,
    #[serde(default)]
    pub estimated_missed_matches: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateInjuryRequest> for InjuryInput {
    fn from(r: CreateInjuryRequest) -> Self {
        Self {
            player_id: r.player_id,
            injured_on: r.injured_on,
            diagnosis: r.diagnosis,
            injury_type: r.injury_type,
            body_region: r.body_region,
            mechanism: r.mechanism,
            condition: r.condition,
            sport_stage: r.sport_stage,
            severity: r.severity,
            estimated_recovery_days: r.estimated_recovery_days,
            estimated_missed_matches: r.estimated_missed_matches,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInjuryRequest {
    pub injured_on: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub injury_type: Option<InjuryType>,
    pub body_region: Option<BodyRegion>,
    pub mechanism: Option<InjuryMechanism>,
    pub condition: Option<InjuryCondition>,
    pub sport_stage: Option<SportStage>,
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "double_option")]
    pub estimated_recovery_days: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub actual_recovery_days: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub estimated_missed_matches: Option<Option<i32>>,
    pub notes: Option<String>,
}

impl From<UpdateInjuryRequest> for UpdateInjuryInput {
    fn from(r: UpdateInjuryRequest) -> Self {
        Self {
            injured_on: r.injured_on,
            diagnosis: r.diagnosis,
            injury_type: r.injury_type,
            body_region: r.body_region,
            mechanism: r.mechanism,
            condition: r.condition,
            sport_stage: r.sport_stage,
            severity: r.severity,
            estimated_recovery_days: r.estimated_recovery_days,
            actual_recovery_days: r.actual_recovery_days,
            estimated_missed_matches: r.estimated_missed_matches,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishInjuryRequest {
    pub ended_on: Option<NaiveDate>,
    pub actual_recovery_days: Option<i32>,
}

impl From<FinishInjuryRequest> for FinishInjuryInput {
    fn from(r: FinishInjuryRequest) -> Self {
        Self {
            ended_on: r.ended_on,
            actual_recovery_days: r.actual_recovery_days,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryResponse {
    pub injury_id: InjuryId,
    pub player_id: PlayerId,
    pub injured_on: NaiveDate,
    pub diagnosis: String,
    pub injury_type: InjuryType,
    pub injury_type_label: &'static str,
    pub body_region: BodyRegion,
    pub body_region_label: &'static str,
    pub mechanism: InjuryMechanism,
    pub mechanism_label: &'static str,
    pub condition: InjuryCondition,
    pub condition_label: &'static str,
    pub sport_stage: SportStage,
    pub sport_stage_label: &'static str,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub estimated_recovery_days: Option<i32>,
    pub actual_recovery_days: Option<i32>,
    pub days_remaining: Option<DaysRemaining>,
    pub estimated_missed_matches: Option<i32>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub ended_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Injury> for InjuryResponse {
    fn from(i: &Injury) -> Self {
        Self {
            injury_id: i.injury_id,
            player_id: i.player_id,
            injured_on: i.injured_on,
            diagnosis: i.diagnosis.clone(),
            injury_type: i.injury_type,
            injury_type_label: i.injury_type.label(),
            body_region: i.body_region,
            body_region_label: i.body_region.label(),
            mechanism: i.mechanism,
            mechanism_label: i.mechanism.label(),
            condition: i.condition,
            condition_label: i.condition.label(),
            sport_stage: i.sport_stage,
            sport_stage_label: i.sport_stage.label(),
            severity: i.severity,
            severity_label: i.severity.label(),
            estimated_recovery_days: i.estimated_recovery_days,
            actual_recovery_days: i.actual_recovery_days,
            days_remaining: i.days_remaining(),
            estimated_missed_matches: i.estimated_missed_matches,
            notes: i.notes.clone(),
            is_active: i.is_active,
            ended_on: i.ended_on,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatusRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub phase: DailyPhase,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<DailyStatusRequest> for DailyStatusInput {
    fn from(r: DailyStatusRequest) -> Self {
        Self {
            date: r.date,
            phase: r.phase,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatusResponse {
    pub status_id: InjuryDailyStatusId,
    pub injury_id: InjuryId,
    pub date: NaiveDate,
    pub phase: DailyPhase,
    pub phase_label: &'static str,
    pub recorded_by: Option<AccountId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&InjuryDailyStatus> for DailyStatusResponse {
    fn from(s: &InjuryDailyStatus) -> Self {
        Self {
            status_id: s.status_id,
            injury_id: s.injury_id,
            date: s.date,
            phase: s.phase,
            phase_label: s.phase.label(),
            recorded_by: s.recorded_by,
            notes: s.notes.clone(),
            created_at: s.created_at,
        }
    }
}

// ============================================================================
// Medical Files
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFileQuery {
    pub player_id: Option<PlayerId>,
    pub kind: Option<FileKind>,
}

impl From<MedicalFileQuery> for MedicalFileFilter {
    fn from(q: MedicalFileQuery) -> Self {
        Self {
            player_id: q.player_id,
            kind: q.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFileResponse {
    pub file_id: MedicalFileId,
    pub player_id: PlayerId,
    pub kind: FileKind,
    pub kind_label: &'static str,
    pub title: String,
    pub document_date: NaiveDate,
    pub file_name: String,
    pub content_type: &'static str,
    pub size_bytes: i64,
    pub notes: Option<String>,
    pub uploaded_by: Option<AccountId>,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&MedicalFile> for MedicalFileResponse {
    fn from(f: &MedicalFile) -> Self {
        Self {
            file_id: f.file_id,
            player_id: f.player_id,
            kind: f.kind,
            kind_label: f.kind.label(),
            title: f.title.clone(),
            document_date: f.document_date,
            file_name: f.original_name.clone(),
            content_type: f.content_type(),
            size_bytes: f.size_bytes,
            notes: f.notes.clone(),
            uploaded_by: f.uploaded_by,
            download_url: format!("/api/medical-files/{}/download", f.file_id),
            created_at: f.created_at,
        }
    }
}

// ============================================================================
// Matches
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<MatchQuery> for MatchFilter {
    fn from(q: MatchQuery) -> Self {
        Self {
            from: q.from,
            to: q.to,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: Venue,
    #[serde(default)]
    pub call_ups: Vec<PlayerId>,
}

impl From<CreateMatchRequest> for MatchInput {
    fn from(r: CreateMatchRequest) -> Self {
        Self {
            date: r.date,
            opponent: r.opponent,
            venue: r.venue,
            call_ups: r.call_ups,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMatchRequest {
    pub date: Option<NaiveDate>,
    pub opponent: Option<String>,
    pub venue: Option<Venue>,
}

impl From<UpdateMatchRequest> for UpdateMatchInput {
    fn from(r: UpdateMatchRequest) -> Self {
        Self {
            date: r.date,
            opponent: r.opponent,
            venue: r.venue,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallUpsRequest {
    pub player_ids: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub match_id: MatchId,
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: Venue,
    pub venue_label: &'static str,
    pub call_ups: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Match> for MatchResponse {
    fn from(m: &Match) -> Self {
        Self {
            match_id: m.match_id,
            date: m.date,
            opponent: m.opponent.clone(),
            venue: m.venue,
            venue_label: m.venue.label(),
            call_ups: m.call_ups.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// ============================================================================
// Checklists
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistQuery {
    pub player_id: Option<PlayerId>,
    pub match_id: Option<MatchId>,
    pub pain: Option<bool>,
}

impl From<ChecklistQuery> for ChecklistFilter {
    fn from(q: ChecklistQuery) -> Self {
        Self {
            player_id: q.player_id,
            match_id: q.match_id,
            pain: q.pain,
        }
    }
}

/// Full checklist content; also the body of `PUT`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistContentRequest {
    #[serde(default)]
    pub pain: bool,
    pub pain_intensity: Option<PainIntensity>,
    pub pain_mechanism: Option<PainMechanism>,
    pub pain_onset: Option<PainOnset>,
    pub pain_zone: Option<PainZone>,
    pub presumptive_diagnosis: Option<String>,
    pub immediate_treatment: Option<String>,
    pub notes: Option<String>,
}

impl From<ChecklistContentRequest> for ChecklistContent {
    fn from(r: ChecklistContentRequest) -> Self {
        Self {
            pain: r.pain,
            pain_detail: PainDetail {
                intensity: r.pain_intensity,
                mechanism: r.pain_mechanism,
                onset: r.pain_onset,
                zone: r.pain_zone,
            },
            presumptive_diagnosis: r.presumptive_diagnosis,
            immediate_treatment: r.immediate_treatment,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChecklistRequest {
    pub player_id: PlayerId,
    pub match_id: MatchId,
    #[serde(flatten)]
    pub content: ChecklistContentRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistResponse {
    pub checklist_id: ChecklistId,
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub filed_by: Option<AccountId>,
    pub pain: bool,
    pub pain_intensity: Option<PainIntensity>,
    pub pain_intensity_label: Option<&'static str>,
    pub pain_mechanism: Option<PainMechanism>,
    pub pain_mechanism_label: Option<&'static str>,
    pub pain_onset: Option<PainOnset>,
    pub pain_onset_label: Option<&'static str>,
    pub pain_zone: Option<PainZone>,
    pub pain_zone_label: Option<&'static str>,
    pub presumptive_diagnosis: Option<String>,
    pub immediate_treatment: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Checklist> for ChecklistResponse {
    fn from(c: &Checklist) -> Self {
        let d = &c.pain_detail;
        Self {
            checklist_id: c.checklist_id,
            player_id: c.player_id,
            match_id: c.match_id,
            filed_by: c.filed_by,
            pain: c.pain,
            pain_intensity: d.intensity,
            pain_intensity_label: d.intensity.map(PainIntensity::label),
            pain_mechanism: d.mechanism,
            pain_mechanism_label: d.mechanism.map(PainMechanism::label),
            pain_onset: d.onset,
            pain_onset_label: d.onset.map(PainOnset::label),
            pain_zone: d.zone,
            pain_zone_label: d.zone.map(PainZone::label),
            presumptive_diagnosis: c.presumptive_diagnosis.clone(),
            immediate_treatment: c.immediate_treatment.clone(),
            notes: c.notes.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
