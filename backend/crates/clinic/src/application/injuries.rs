//! Injury Use Cases
//!
//! Injury records, closing an injury, and the daily rehabilitation log.

use std::sync::Arc;

use auth::CurrentUser;
use chrono::{NaiveDate, Utc};
use kernel::id::{InjuryId, PlayerId};

use crate::domain::choices::{
    BodyRegion, DailyPhase, InjuryCondition, InjuryMechanism, InjuryType, Severity, SportStage,
};
use crate::domain::entity::injury::{Injury, InjuryDailyStatus};
use crate::domain::repository::{ClinicStore, InjuryFilter};
use crate::domain::text::{self, LONG_TEXT};
use crate::error::{ClinicError, ClinicResult};

#[derive(Debug, Clone)]
pub struct InjuryInput {
    pub player_id: PlayerId,
    pub injured_on: NaiveDate,
    pub diagnosis: String,
    pub injury_type: InjuryType,
    pub body_region: BodyRegion,
    pub mechanism: InjuryMechanism,
    pub condition: InjuryCondition,
    pub sport_stage: SportStage,
    pub severity: Severity,
    pub estimated_recovery_days: Option<i32>,
    pub estimated_missed_matches: Option<i32>,
    pub notes: Option<String>,
}

/// Partial update; `Some(None)` clears a nullable field, `Some("")` the notes
#[derive(Debug, Clone, Default)]
pub struct UpdateInjuryInput {
    pub injured_on: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub injury_type: Option<InjuryType>,
    pub body_region: Option<BodyRegion>,
    pub mechanism: Option<InjuryMechanism>,
    pub condition: Option<InjuryCondition>,
    pub sport_stage: Option<SportStage>,
    pub severity: Option<Severity>,
    pub estimated_recovery_days: Option<Option<i32>>,
    pub actual_recovery_days: Option<Option<i32>>,
    pub estimated_missed_matches: Option<Option<i32>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FinishInjuryInput {
    /// Defaults to today
    pub ended_on: Option<NaiveDate>,
    /// Defaults to the days between injury and end
    pub actual_recovery_days: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct DailyStatusInput {
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub phase: DailyPhase,
    pub notes: Option<String>,
}

pub struct InjuriesUseCase<R: ClinicStore> {
    repo: Arc<R>,
}

impl<R: ClinicStore> InjuriesUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        _actor: &CurrentUser,
        filter: &InjuryFilter,
    ) -> ClinicResult<Vec<Injury>> {
        self.repo.list_injuries(filter).await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &InjuryId) -> ClinicResult<Injury> {
        self.find(id).await
    }

    pub async fn create(&self, actor: &CurrentUser, input: InjuryInput) -> ClinicResult<Injury> {
        actor.ensure_can_write()?;
        if self.repo.find_player(&input.player_id).await?.is_none() {
            return Err(ClinicError::invalid("playerId", "Unknown player"));
        }
        check_not_future(input.injured_on, "injuredOn")?;

        let now = Utc::now();
        let injury = Injury {
            injury_id: InjuryId::new(),
            player_id: input.player_id,
            injured_on: input.injured_on,
            diagnosis: text::required(&input.diagnosis, "diagnosis", LONG_TEXT)?,
            injury_type: input.injury_type,
            body_region: input.body_region,
            mechanism: input.mechanism,
            condition: input.condition,
            sport_stage: input.sport_stage,
            severity: input.severity,
            estimated_recovery_days: text::non_negative(
                input.estimated_recovery_days,
                "estimatedRecoveryDays",
            )?,
            actual_recovery_days: None,
            notes: text::optional(input.notes.as_deref(), "notes", LONG_TEXT)?,
            estimated_missed_matches: text::non_negative(
                input.estimated_missed_matches,
                "estimatedMissedMatches",
            )?,
            is_active: true,
            ended_on: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create_injury(&injury).await?;

        tracing::info!(
            injury_id = %injury.injury_id,
            player_id = %injury.player_id,
            injury_type = %injury.injury_type,
            severity = %injury.severity,
            by = %actor.public_id,
            "Injury recorded"
        );
        Ok(injury)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &InjuryId,
        input: UpdateInjuryInput,
    ) -> ClinicResult<Injury> {
        actor.ensure_can_write()?;
        let mut injury = self.find(id).await?;

        if let Some(injured_on) = input.injured_on {
            check_not_future(injured_on, "injuredOn")?;
            if injury.ended_on.is_some_and(|end| end < injured_on) {
                return Err(ClinicError::invalid("injuredOn", "Injury date is after its end date"));
            }
            injury.injured_on = injured_on;
        }
        if let Some(diagnosis) = input.diagnosis {
            injury.diagnosis = text::required(&diagnosis, "diagnosis", LONG_TEXT)?;
        }
        if let Some(v) = input.injury_type {
            injury.injury_type = v;
        }
        if let Some(v) = input.body_region {
            injury.body_region = v;
        }
        if let Some(v) = input.mechanism {
            injury.mechanism = v;
        }
        if let Some(v) = input.condition {
            injury.condition = v;
        }
        if let Some(v) = input.sport_stage {
            injury.sport_stage = v;
        }
        if let Some(v) = input.severity {
            injury.severity = v;
        }
        if let Some(days) = input.estimated_recovery_days {
            injury.estimated_recovery_days = text::non_negative(days, "estimatedRecoveryDays")?;
        }
        if let Some(days) = input.actual_recovery_days {
            injury.actual_recovery_days = text::non_negative(days, "actualRecoveryDays")?;
        }
        if let Some(matches) = input.estimated_missed_matches {
            injury.estimated_missed_matches =
                text::non_negative(matches, "estimatedMissedMatches")?;
        }
        if let Some(notes) = input.notes {
            injury.notes = text::optional(Some(notes.as_str()), "notes", LONG_TEXT)?;
        }

        injury.touch();
        self.repo.update_injury(&injury).await?;
        tracing::info!(injury_id = %injury.injury_id, by = %actor.public_id, "Injury updated");
        Ok(injury)
    }

    /// Close an active injury
    pub async fn finish(
        &self,
        actor: &CurrentUser,
        id: &InjuryId,
        input: FinishInjuryInput,
    ) -> ClinicResult<Injury> {
        actor.ensure_can_write()?;
        let mut injury = self.find(id).await?;
        if !injury.is_active {
            return Err(ClinicError::rule(None, "The injury is already finished"));
        }

        let ended_on = input.ended_on.unwrap_or_else(|| Utc::now().date_naive());
        check_not_future(ended_on, "endedOn")?;
        if ended_on < injury.injured_on {
            return Err(ClinicError::invalid("endedOn", "End date is before the injury date"));
        }
        let actual = text::non_negative(input.actual_recovery_days, "actualRecoveryDays")?;

        injury.finish(ended_on, actual);
        self.repo.update_injury(&injury).await?;

        tracing::info!(
            injury_id = %injury.injury_id,
            ended_on = %ended_on,
            actual_recovery_days = ?injury.actual_recovery_days,
            "Injury finished"
        );
        Ok(injury)
    }

    pub async fn delete(&self, actor: &CurrentUser, id: &InjuryId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        if !self.repo.delete_injury(id).await? {
            return Err(ClinicError::NotFound("Injury"));
        }
        tracing::info!(injury_id = %id, by = %actor.public_id, "Injury deleted");
        Ok(())
    }

    /// Log today's (or the given day's) rehabilitation phase
    pub async fn record_daily_status(
        &self,
        actor: &CurrentUser,
        id: &InjuryId,
        input: DailyStatusInput,
    ) -> ClinicResult<InjuryDailyStatus> {
        actor.ensure_can_write()?;
        let injury = self.find(id).await?;
        if !injury.is_active {
            return Err(ClinicError::rule(
                None,
                "Daily status can only be recorded for active injuries",
            ));
        }

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        check_not_future(date, "date")?;
        if date < injury.injured_on {
            return Err(ClinicError::invalid("date", "Date is before the injury date"));
        }
        if self.repo.daily_status_exists(id, date).await? {
            return Err(ClinicError::conflict(
                "date",
                "A status was already recorded for this injury on that day",
            ));
        }

        let status = InjuryDailyStatus::new(
            injury.injury_id,
            date,
            input.phase,
            Some(actor.account_id),
            text::optional(input.notes.as_deref(), "notes", LONG_TEXT)?,
        );
        self.repo.create_daily_status(&status).await?;

        tracing::info!(injury_id = %id, date = %date, phase = %status.phase, "Daily status recorded");
        Ok(status)
    }

    pub async fn daily_history(
        &self,
        _actor: &CurrentUser,
        id: &InjuryId,
    ) -> ClinicResult<Vec<InjuryDailyStatus>> {
        self.find(id).await?;
        self.repo.list_daily_statuses(id).await
    }

    async fn find(&self, id: &InjuryId) -> ClinicResult<Injury> {
        self.repo
            .find_injury(id)
            .await?
            .ok_or(ClinicError::NotFound("Injury"))
    }
}

fn check_not_future(date: NaiveDate, field: &'static str) -> ClinicResult<()> {
    if date > Utc::now().date_naive() {
        return Err(ClinicError::invalid(field, "Date cannot be in the future"));
    }
    Ok(())
}

#[cfg(test)]
impl InjuryInput {
    pub(crate) fn sample(player_id: PlayerId, injured_on: NaiveDate) -> Self {
        Self {
            player_id,
            injured_on,
            diagnosis: "Esguince de tobillo grado II".into(),
            injury_type: InjuryType::Ligament,
            body_region: BodyRegion::AnkleRight,
            mechanism: InjuryMechanism::Contact,
            condition: InjuryCondition::Acute,
            sport_stage: SportStage::Competition,
            severity: Severity::Moderate,
            estimated_recovery_days: Some(21),
            estimated_missed_matches: Some(3),
            notes: None,
        }
    }
}
