//! Post-Match Checklist Use Cases
//!
//! One checklist per called-up player and match. Reporting no pain clears
//! the pain detail.

use std::sync::Arc;

use auth::CurrentUser;
use chrono::Utc;
use kernel::id::{ChecklistId, MatchId, PlayerId};

use crate::domain::entity::checklist::{Checklist, PainDetail};
use crate::domain::repository::{ChecklistFilter, ClinicStore};
use crate::domain::text::{self, LONG_TEXT};
use crate::error::{ClinicError, ClinicResult};

/// Editable content of a checklist
#[derive(Debug, Clone, Default)]
pub struct ChecklistContent {
    pub pain: bool,
    pub pain_detail: PainDetail,
    pub presumptive_diagnosis: Option<String>,
    pub immediate_treatment: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChecklistInput {
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub content: ChecklistContent,
}

pub struct ChecklistsUseCase<R: ClinicStore> {
    repo: Arc<R>,
}

impl<R: ClinicStore> ChecklistsUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        _actor: &CurrentUser,
        filter: &ChecklistFilter,
    ) -> ClinicResult<Vec<Checklist>> {
        self.repo.list_checklists(filter).await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &ChecklistId) -> ClinicResult<Checklist> {
        self.find(id).await
    }

    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: ChecklistInput,
    ) -> ClinicResult<Checklist> {
        actor.ensure_can_write()?;

        let m = self
            .repo
            .find_match(&input.match_id)
            .await?
            .ok_or_else(|| ClinicError::invalid("match", "Unknown match"))?;
        if self.repo.find_player(&input.player_id).await?.is_none() {
            return Err(ClinicError::invalid("player", "Unknown player"));
        }
        if !m.is_called_up(&input.player_id) {
            return Err(ClinicError::rule(
                Some("player"),
                "The player was not called up for this match",
            ));
        }
        if self
            .repo
            .find_checklist_for(&input.player_id, &input.match_id)
            .await?
            .is_some()
        {
            return Err(ClinicError::conflict(
                "match",
                "A checklist already exists for this player and match",
            ));
        }

        let now = Utc::now();
        let mut checklist = Checklist {
            checklist_id: ChecklistId::new(),
            player_id: input.player_id,
            match_id: input.match_id,
            filed_by: Some(actor.account_id),
            pain: false,
            pain_detail: PainDetail::default(),
            presumptive_diagnosis: None,
            immediate_treatment: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut checklist, input.content)?;
        self.repo.create_checklist(&checklist).await?;

        tracing::info!(
            checklist_id = %checklist.checklist_id,
            player_id = %checklist.player_id,
            match_id = %checklist.match_id,
            pain = checklist.pain,
            "Checklist filed"
        );
        Ok(checklist)
    }

    /// Replace the editable content; player and match are fixed
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &ChecklistId,
        content: ChecklistContent,
    ) -> ClinicResult<Checklist> {
        actor.ensure_can_write()?;
        let mut checklist = self.find(id).await?;
        apply(&mut checklist, content)?;
        checklist.touch();
        self.repo.update_checklist(&checklist).await?;
        tracing::info!(checklist_id = %id, pain = checklist.pain, "Checklist updated");
        Ok(checklist)
    }

    pub async fn delete(&self, actor: &CurrentUser, id: &ChecklistId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        if !self.repo.delete_checklist(id).await? {
            return Err(ClinicError::NotFound("Checklist"));
        }
        tracing::info!(checklist_id = %id, by = %actor.public_id, "Checklist deleted");
        Ok(())
    }

    async fn find(&self, id: &ChecklistId) -> ClinicResult<Checklist> {
        self.repo
            .find_checklist(id)
            .await?
            .ok_or(ClinicError::NotFound("Checklist"))
    }
}

fn apply(checklist: &mut Checklist, content: ChecklistContent) -> ClinicResult<()> {
    checklist.presumptive_diagnosis = text::optional(
        content.presumptive_diagnosis.as_deref(),
        "presumptiveDiagnosis",
        LONG_TEXT,
    )?;
    checklist.immediate_treatment = text::optional(
        content.immediate_treatment.as_deref(),
        "immediateTreatment",
        LONG_TEXT,
    )?;
    checklist.notes = text::optional(content.notes.as_deref(), "notes", LONG_TEXT)?;
    checklist.set_pain(content.pain, content.pain_detail);
    Ok(())
}
