//! Kinesiology Treatment Use Cases

use std::sync::Arc;

use auth::CurrentUser;
use chrono::{DateTime, Utc};
use kernel::id::{PlayerId, TreatmentId};

use crate::domain::choices::TreatmentStatus;
use crate::domain::entity::treatment::Treatment;
use crate::domain::repository::{ClinicStore, TreatmentFilter};
use crate::domain::text::{self, LONG_TEXT};
use crate::error::{ClinicError, ClinicResult};

#[derive(Debug, Clone)]
pub struct TreatmentInput {
    pub player_id: PlayerId,
    /// Defaults to now
    pub attended_at: Option<DateTime<Utc>>,
    pub reason: String,
    pub procedures: String,
    pub status: TreatmentStatus,
    pub notes: Option<String>,
}

/// Partial update; `Some("")` clears the notes
#[derive(Debug, Clone, Default)]
pub struct UpdateTreatmentInput {
    pub attended_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub procedures: Option<String>,
    pub status: Option<TreatmentStatus>,
    pub notes: Option<String>,
}

pub struct TreatmentsUseCase<R: ClinicStore> {
    repo: Arc<R>,
}

impl<R: ClinicStore> TreatmentsUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        _actor: &CurrentUser,
        filter: &TreatmentFilter,
    ) -> ClinicResult<Vec<Treatment>> {
        self.repo.list_treatments(filter).await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &TreatmentId) -> ClinicResult<Treatment> {
        self.find(id).await
    }

    /// Record an attendance; the caller is the professional in charge
    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: TreatmentInput,
    ) -> ClinicResult<Treatment> {
        actor.ensure_can_write()?;
        if self.repo.find_player(&input.player_id).await?.is_none() {
            return Err(ClinicError::invalid("playerId", "Unknown player"));
        }

        let now = Utc::now();
        let attended_at = input.attended_at.unwrap_or(now);
        check_not_future(attended_at)?;

        let treatment = Treatment {
            treatment_id: TreatmentId::new(),
            player_id: input.player_id,
            professional_id: Some(actor.account_id),
            attended_at,
            reason: text::required(&input.reason, "reason", LONG_TEXT)?,
            procedures: text::required(&input.procedures, "procedures", LONG_TEXT)?,
            status: input.status,
            notes: text::optional(input.notes.as_deref(), "notes", LONG_TEXT)?,
            created_at: now,
            updated_at: now,
        };
        self.repo.create_treatment(&treatment).await?;

        tracing::info!(
            treatment_id = %treatment.treatment_id,
            player_id = %treatment.player_id,
            status = %treatment.status,
            by = %actor.public_id,
            "Treatment recorded"
        );
        Ok(treatment)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &TreatmentId,
        input: UpdateTreatmentInput,
    ) -> ClinicResult<Treatment> {
        actor.ensure_can_write()?;
        let mut treatment = self.find(id).await?;

        if let Some(attended_at) = input.attended_at {
            check_not_future(attended_at)?;
            treatment.attended_at = attended_at;
        }
        if let Some(reason) = input.reason {
            treatment.reason = text::required(&reason, "reason", LONG_TEXT)?;
        }
        if let Some(procedures) = input.procedures {
            treatment.procedures = text::required(&procedures, "procedures", LONG_TEXT)?;
        }
        if let Some(status) = input.status {
            treatment.status = status;
        }
        if let Some(notes) = input.notes {
            treatment.notes = text::optional(Some(notes.as_str()), "notes", LONG_TEXT)?;
        }

        treatment.touch();
        self.repo.update_treatment(&treatment).await?;
        tracing::info!(treatment_id = %treatment.treatment_id, status = %treatment.status, "Treatment updated");
        Ok(treatment)
    }

    pub async fn delete(&self, actor: &CurrentUser, id: &TreatmentId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        if !self.repo.delete_treatment(id).await? {
            return Err(ClinicError::NotFound("Treatment"));
        }
        tracing::info!(treatment_id = %id, by = %actor.public_id, "Treatment deleted");
        Ok(())
    }

    async fn find(&self, id: &TreatmentId) -> ClinicResult<Treatment> {
        self.repo
            .find_treatment(id)
            .await?
            .ok_or(ClinicError::NotFound("Treatment"))
    }
}

/// Small clock skew between client and server is tolerated
fn check_not_future(at: DateTime<Utc>) -> ClinicResult<()> {
    if at > Utc::now() + chrono::Duration::minutes(5) {
        return Err(ClinicError::invalid("attendedAt", "Date cannot be in the future"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::players::{PlayerInput, PlayersUseCase};
    use crate::domain::entity::player::Player;
    use crate::testing::{InMemoryClinicStore, coach, medic, test_config, test_files};

    async fn seed(repo: &Arc<InMemoryClinicStore>, rut: &str) -> Player {
        let (_tmp, files) = test_files().await;
        PlayersUseCase::new(repo.clone(), files, test_config())
            .create(&medic(), PlayerInput::sample(rut))
            .await
            .unwrap()
    }

    fn input(player_id: PlayerId, hours_ago: i64) -> TreatmentInput {
        TreatmentInput {
            player_id,
            attended_at: Some(Utc::now() - chrono::Duration::hours(hours_ago)),
            reason: "Dolor en aductor derecho".into(),
            procedures: "Masoterapia, TENS 20 min".into(),
            status: TreatmentStatus::InTreatment,
            notes: Some("  ".into()),
        }
    }

    #[tokio::test]
    async fn test_create_list_newest_first() {
        let repo = Arc::new(InMemoryClinicStore::new());
        let a = seed(&repo, "12345678-5").await;
        let b = seed(&repo, "7654321-6").await;
        let uc = TreatmentsUseCase::new(repo.clone());
        let actor = medic();

        let old = uc.create(&actor, input(a.player_id, 48)).await.unwrap();
        let new = uc.create(&actor, input(a.player_id, 1)).await.unwrap();
        uc.create(&actor, input(b.player_id, 2)).await.unwrap();
        assert_eq!(old.professional_id, Some(actor.account_id));
        assert_eq!(old.notes, None);

        let list = uc
            .list(
                &coach(),
                &TreatmentFilter {
                    player_id: Some(a.player_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<_> = list.iter().map(|t| t.treatment_id).collect();
        assert_eq!(ids, vec![new.treatment_id, old.treatment_id]);

        let by_professional = uc
            .list(
                &coach(),
                &TreatmentFilter {
                    professional_id: Some(actor.account_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_professional.len(), 3);
    }

    #[tokio::test]
    async fn test_update_status_and_delete() {
        let repo = Arc::new(InMemoryClinicStore::new());
        let p = seed(&repo, "12345678-5").await;
        let uc = TreatmentsUseCase::new(repo.clone());
        let actor = medic();
        let t = uc.create(&actor, input(p.player_id, 3)).await.unwrap();

        let updated = uc
            .update(
                &actor,
                &t.treatment_id,
                UpdateTreatmentInput {
                    status: Some(TreatmentStatus::Discharged),
                    notes: Some("Alta para entrenar".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, TreatmentStatus::Discharged);
        assert_eq!(updated.notes.as_deref(), Some("Alta para entrenar"));

        let discharged = uc
            .list(
                &actor,
                &TreatmentFilter {
                    status: Some(TreatmentStatus::Discharged),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(discharged.len(), 1);

        assert_eq!(
            uc.delete(&coach(), &t.treatment_id).await.unwrap_err().status_code(),
            403
        );
        uc.delete(&actor, &t.treatment_id).await.unwrap();
        assert_eq!(repo.treatment_count(), 0);
    }

    #[tokio::test]
    async fn test_rejects_unknown_player_and_future_date() {
        let repo = Arc::new(InMemoryClinicStore::new());
        let p = seed(&repo, "12345678-5").await;
        let uc = TreatmentsUseCase::new(repo);

        let err = uc.create(&medic(), input(PlayerId::new(), 1)).await.unwrap_err();
        assert_eq!(err.into_app_error().field(), Some("playerId"));

        let err = uc.create(&medic(), input(p.player_id, -24)).await.unwrap_err();
        assert_eq!(err.into_app_error().field(), Some("attendedAt"));

        let mut blank = input(p.player_id, 1);
        blank.reason = "   ".into();
        assert_eq!(
            uc.create(&medic(), blank).await.unwrap_err().into_app_error().field(),
            Some("reason")
        );
    }
}
