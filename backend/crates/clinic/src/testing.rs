//! In-memory store and fixtures for use case and router tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use auth::domain::value_object::public_id::PublicId;
use auth::{CurrentUser, StaffRole};
use chrono::NaiveDate;
use kernel::id::{
    AccountId, ChecklistId, DivisionId, InjuryId, MatchId, MedicalFileId, PlayerId, TreatmentId,
};
use kernel::rut::Rut;
use platform::storage::FileStore;
use uuid::Uuid;

use crate::application::config::ClinicConfig;
use crate::domain::entity::{
    checklist::Checklist,
    division::{Division, DivisionSummary},
    injury::{Injury, InjuryDailyStatus},
    matches::Match,
    medical_file::MedicalFile,
    player::{Player, numeric_record_number},
    treatment::Treatment,
};
use crate::domain::repository::{
    ChecklistFilter, ChecklistRepository, DivisionRepository, InjuryFilter, InjuryRepository,
    MatchFilter, MatchRepository, MedicalFileFilter, MedicalFileRepository, PlayerFilter,
    PlayerRepository, TreatmentFilter, TreatmentRepository,
};
use crate::error::{ClinicError, ClinicResult};

#[derive(Default)]
struct State {
    divisions: HashMap<DivisionId, Division>,
    players: HashMap<PlayerId, Player>,
    treatments: HashMap<TreatmentId, Treatment>,
    injuries: HashMap<InjuryId, Injury>,
    daily_statuses: Vec<InjuryDailyStatus>,
    files: HashMap<MedicalFileId, MedicalFile>,
    matches: HashMap<MatchId, Match>,
    checklists: HashMap<ChecklistId, Checklist>,
}

#[derive(Clone, Default)]
pub struct InMemoryClinicStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn treatment_count(&self) -> usize {
        self.state.lock().unwrap().treatments.len()
    }

    pub fn checklist_count(&self) -> usize {
        self.state.lock().unwrap().checklists.len()
    }
}

fn sort_players(players: &mut [Player]) {
    players.sort_by(|a, b| {
        (a.last_names.as_str(), a.first_names.as_str())
            .cmp(&(b.last_names.as_str(), b.first_names.as_str()))
    });
}

impl DivisionRepository for InMemoryClinicStore {
    async fn create_division(&self, division: &Division) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.divisions.values().any(|d| d.name == division.name) {
            return Err(ClinicError::conflict("name", "A division with this name already exists"));
        }
        state.divisions.insert(division.division_id, division.clone());
        Ok(())
    }

    async fn find_division(&self, division_id: &DivisionId) -> ClinicResult<Option<Division>> {
        Ok(self.state.lock().unwrap().divisions.get(division_id).cloned())
    }

    async fn list_divisions(&self) -> ClinicResult<Vec<DivisionSummary>> {
        let state = self.state.lock().unwrap();
        let mut out: Vec<DivisionSummary> = state
            .divisions
            .values()
            .map(|d| DivisionSummary {
                division: d.clone(),
                active_players: state
                    .players
                    .values()
                    .filter(|p| p.is_active && p.division_id == Some(d.division_id))
                    .count() as i64,
            })
            .collect();
        out.sort_by(|a, b| a.division.name.cmp(&b.division.name));
        Ok(out)
    }

    async fn update_division(&self, division: &Division) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state
            .divisions
            .values()
            .any(|d| d.name == division.name && d.division_id != division.division_id)
        {
            return Err(ClinicError::conflict("name", "A division with this name already exists"));
        }
        state.divisions.insert(division.division_id, division.clone());
        Ok(())
    }

    async fn delete_division(&self, division_id: &DivisionId) -> ClinicResult<bool> {
        let mut state = self.state.lock().unwrap();
        for player in state.players.values_mut() {
            if player.division_id.as_ref() == Some(division_id) {
                player.division_id = None;
            }
        }
        Ok(state.divisions.remove(division_id).is_some())
    }
}

impl PlayerRepository for InMemoryClinicStore {
    async fn create_player(&self, player: &Player) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.players.values().any(|p| p.rut == player.rut) {
            return Err(ClinicError::conflict("rut", "A player with this RUT already exists"));
        }
        if state
            .players
            .values()
            .any(|p| p.record_number == player.record_number)
        {
            return Err(ClinicError::conflict("recordNumber", "Record number already in use"));
        }
        state.players.insert(player.player_id, player.clone());
        Ok(())
    }

    async fn find_player(&self, player_id: &PlayerId) -> ClinicResult<Option<Player>> {
        Ok(self.state.lock().unwrap().players.get(player_id).cloned())
    }

    async fn find_player_by_rut(&self, rut: &Rut) -> ClinicResult<Option<Player>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .players
            .values()
            .find(|p| &p.rut == rut)
            .cloned())
    }

    async fn record_number_taken(
        &self,
        number: &str,
        except: Option<&PlayerId>,
    ) -> ClinicResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .players
            .values()
            .any(|p| p.record_number == number && Some(&p.player_id) != except))
    }

    async fn max_record_number(&self) -> ClinicResult<u64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .players
            .values()
            .filter_map(|p| numeric_record_number(&p.record_number))
            .max()
            .unwrap_or(0))
    }

    async fn list_players(&self, filter: &PlayerFilter) -> ClinicResult<Vec<Player>> {
        let mut players: Vec<Player> = self
            .state
            .lock()
            .unwrap()
            .players
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort_players(&mut players);
        Ok(players)
    }

    async fn existing_player_ids(&self, ids: &[PlayerId]) -> ClinicResult<Vec<PlayerId>> {
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .filter(|id| state.players.contains_key(*id))
            .copied()
            .collect())
    }

    async fn update_player(&self, player: &Player) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state
            .players
            .values()
            .any(|p| p.rut == player.rut && p.player_id != player.player_id)
        {
            return Err(ClinicError::conflict("rut", "A player with this RUT already exists"));
        }
        state.players.insert(player.player_id, player.clone());
        Ok(())
    }

    async fn delete_player(&self, player_id: &PlayerId) -> ClinicResult<bool> {
        let mut state = self.state.lock().unwrap();
        let removed = state.players.remove(player_id).is_some();

        state.treatments.retain(|_, t| &t.player_id != player_id);
        let injuries: Vec<InjuryId> = state
            .injuries
            .values()
            .filter(|i| &i.player_id == player_id)
            .map(|i| i.injury_id)
            .collect();
        state.injuries.retain(|_, i| &i.player_id != player_id);
        state.daily_statuses.retain(|s| !injuries.contains(&s.injury_id));
        state.files.retain(|_, f| &f.player_id != player_id);
        state.checklists.retain(|_, c| &c.player_id != player_id);
        for m in state.matches.values_mut() {
            m.call_ups.retain(|p| p != player_id);
        }
        Ok(removed)
    }
}

impl TreatmentRepository for InMemoryClinicStore {
    async fn create_treatment(&self, treatment: &Treatment) -> ClinicResult<()> {
        self.state
            .lock()
            .unwrap()
            .treatments
            .insert(treatment.treatment_id, treatment.clone());
        Ok(())
    }

    async fn find_treatment(&self, treatment_id: &TreatmentId) -> ClinicResult<Option<Treatment>> {
        Ok(self.state.lock().unwrap().treatments.get(treatment_id).cloned())
    }

    async fn list_treatments(&self, filter: &TreatmentFilter) -> ClinicResult<Vec<Treatment>> {
        let mut out: Vec<Treatment> = self
            .state
            .lock()
            .unwrap()
            .treatments
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.attended_at.cmp(&a.attended_at));
        Ok(out)
    }

    async fn update_treatment(&self, treatment: &Treatment) -> ClinicResult<()> {
        self.create_treatment(treatment).await
    }

    async fn delete_treatment(&self, treatment_id: &TreatmentId) -> ClinicResult<bool> {
        Ok(self.state.lock().unwrap().treatments.remove(treatment_id).is_some())
    }
}

impl InjuryRepository for InMemoryClinicStore {
    async fn create_injury(&self, injury: &Injury) -> ClinicResult<()> {
        self.state
            .lock()
            .unwrap()
            .injuries
            .insert(injury.injury_id, injury.clone());
        Ok(())
    }

    async fn find_injury(&self, injury_id: &InjuryId) -> ClinicResult<Option<Injury>> {
        Ok(self.state.lock().unwrap().injuries.get(injury_id).cloned())
    }

    async fn list_injuries(&self, filter: &InjuryFilter) -> ClinicResult<Vec<Injury>> {
        let mut out: Vec<Injury> = self
            .state
            .lock()
            .unwrap()
            .injuries
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.injured_on.cmp(&a.injured_on));
        Ok(out)
    }

    async fn update_injury(&self, injury: &Injury) -> ClinicResult<()> {
        self.create_injury(injury).await
    }

    async fn delete_injury(&self, injury_id: &InjuryId) -> ClinicResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.daily_statuses.retain(|s| &s.injury_id != injury_id);
        Ok(state.injuries.remove(injury_id).is_some())
    }

    async fn create_daily_status(&self, status: &InjuryDailyStatus) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state
            .daily_statuses
            .iter()
            .any(|s| s.injury_id == status.injury_id && s.date == status.date)
        {
            return Err(ClinicError::conflict(
                "date",
                "A status was already recorded for this injury on that day",
            ));
        }
        state.daily_statuses.push(status.clone());
        Ok(())
    }

    async fn daily_status_exists(
        &self,
        injury_id: &InjuryId,
        date: NaiveDate,
    ) -> ClinicResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .daily_statuses
            .iter()
            .any(|s| &s.injury_id == injury_id && s.date == date))
    }

    async fn list_daily_statuses(
        &self,
        injury_id: &InjuryId,
    ) -> ClinicResult<Vec<InjuryDailyStatus>> {
        let mut out: Vec<InjuryDailyStatus> = self
            .state
            .lock()
            .unwrap()
            .daily_statuses
            .iter()
            .filter(|s| &s.injury_id == injury_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }
}

impl MedicalFileRepository for InMemoryClinicStore {
    async fn create_medical_file(&self, file: &MedicalFile) -> ClinicResult<()> {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(file.file_id, file.clone());
        Ok(())
    }

    async fn find_medical_file(
        &self,
        file_id: &MedicalFileId,
    ) -> ClinicResult<Option<MedicalFile>> {
        Ok(self.state.lock().unwrap().files.get(file_id).cloned())
    }

    async fn list_medical_files(
        &self,
        filter: &MedicalFileFilter,
    ) -> ClinicResult<Vec<MedicalFile>> {
        let mut out: Vec<MedicalFile> = self
            .state
            .lock()
            .unwrap()
            .files
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.document_date.cmp(&a.document_date));
        Ok(out)
    }

    async fn delete_medical_file(&self, file_id: &MedicalFileId) -> ClinicResult<bool> {
        Ok(self.state.lock().unwrap().files.remove(file_id).is_some())
    }
}

impl MatchRepository for InMemoryClinicStore {
    async fn create_match(&self, m: &Match) -> ClinicResult<()> {
        self.state.lock().unwrap().matches.insert(m.match_id, m.clone());
        Ok(())
    }

    async fn find_match(&self, match_id: &MatchId) -> ClinicResult<Option<Match>> {
        Ok(self.state.lock().unwrap().matches.get(match_id).cloned())
    }

    async fn list_matches(&self, filter: &MatchFilter) -> ClinicResult<Vec<Match>> {
        let mut out: Vec<Match> = self
            .state
            .lock()
            .unwrap()
            .matches
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    async fn update_match(&self, m: &Match) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.matches.get_mut(&m.match_id) {
            existing.date = m.date;
            existing.opponent = m.opponent.clone();
            existing.venue = m.venue;
            existing.updated_at = m.updated_at;
        }
        Ok(())
    }

    async fn set_call_ups(&self, match_id: &MatchId, players: &[PlayerId]) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.matches.get_mut(match_id) {
            existing.call_ups = players.to_vec();
        }
        Ok(())
    }

    async fn list_call_up_players(&self, match_id: &MatchId) -> ClinicResult<Vec<Player>> {
        let state = self.state.lock().unwrap();
        let Some(m) = state.matches.get(match_id) else {
            return Ok(Vec::new());
        };
        let mut players: Vec<Player> = m
            .call_ups
            .iter()
            .filter_map(|id| state.players.get(id).cloned())
            .collect();
        sort_players(&mut players);
        Ok(players)
    }

    async fn delete_match(&self, match_id: &MatchId) -> ClinicResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.checklists.retain(|_, c| &c.match_id != match_id);
        Ok(state.matches.remove(match_id).is_some())
    }
}

impl ChecklistRepository for InMemoryClinicStore {
    async fn create_checklist(&self, checklist: &Checklist) -> ClinicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state
            .checklists
            .values()
            .any(|c| c.player_id == checklist.player_id && c.match_id == checklist.match_id)
        {
            return Err(ClinicError::conflict(
                "match",
                "A checklist already exists for this player and match",
            ));
        }
        state.checklists.insert(checklist.checklist_id, checklist.clone());
        Ok(())
    }

    async fn find_checklist(&self, checklist_id: &ChecklistId) -> ClinicResult<Option<Checklist>> {
        Ok(self.state.lock().unwrap().checklists.get(checklist_id).cloned())
    }

    async fn find_checklist_for(
        &self,
        player_id: &PlayerId,
        match_id: &MatchId,
    ) -> ClinicResult<Option<Checklist>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .checklists
            .values()
            .find(|c| &c.player_id == player_id && &c.match_id == match_id)
            .cloned())
    }

    async fn list_checklists(&self, filter: &ChecklistFilter) -> ClinicResult<Vec<Checklist>> {
        let state = self.state.lock().unwrap();
        let match_date = |c: &Checklist| state.matches.get(&c.match_id).map(|m| m.date);
        let mut out: Vec<Checklist> = state
            .checklists
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (match_date(b), b.created_at).cmp(&(match_date(a), a.created_at))
        });
        Ok(out)
    }

    async fn update_checklist(&self, checklist: &Checklist) -> ClinicResult<()> {
        self.state
            .lock()
            .unwrap()
            .checklists
            .insert(checklist.checklist_id, checklist.clone());
        Ok(())
    }

    async fn delete_checklist(&self, checklist_id: &ChecklistId) -> ClinicResult<bool> {
        Ok(self.state.lock().unwrap().checklists.remove(checklist_id).is_some())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn test_config() -> Arc<ClinicConfig> {
    Arc::new(ClinicConfig::development())
}

/// File store rooted in a fresh temp dir; keep the guard alive
pub async fn test_files() -> (tempfile::TempDir, FileStore) {
    let tmp = tempfile::tempdir().unwrap();
    let files = FileStore::open(tmp.path().join("media")).await.unwrap();
    (tmp, files)
}

pub fn user(role: StaffRole) -> CurrentUser {
    CurrentUser {
        account_id: AccountId::new(),
        public_id: PublicId::new(),
        rut: "11111111-1".to_string(),
        full_name: "Paula Muñoz".to_string(),
        role,
        session_id: Uuid::new_v4(),
    }
}

pub fn medic() -> CurrentUser {
    user(StaffRole::Medical)
}

pub fn coach() -> CurrentUser {
    user(StaffRole::Technical)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
