use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, InjuryDailyStatusId, InjuryId, PlayerId};
use uuid::Uuid;

use super::{PgClinicRepository, choice};
use crate::domain::choices::{
    BodyRegion, DailyPhase, InjuryCondition, InjuryMechanism, InjuryType, Severity, SportStage,
};
use crate::domain::entity::injury::{Injury, InjuryDailyStatus};
use crate::domain::repository::{InjuryFilter, InjuryRepository};
use crate::error::ClinicResult;

const INJURY_COLUMNS: &str = r#"
    injury_id,
    player_id,
    injured_on,
    diagnosis,
    injury_type,
    body_region,
    mechanism,
    condition,
    sport_stage,
    severity,
    estimated_recovery_days,
    actual_recovery_days,
    notes,
    estimated_missed_matches,
    is_active,
    ended_on,
    created_at,
    updated_at
"#;

impl InjuryRepository for PgClinicRepository {
    async fn create_injury(&self, injury: &Injury) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO injuries (
                injury_id,
                player_id,
                injured_on,
                diagnosis,
                injury_type,
                body_region,
                mechanism,
                condition,
                sport_stage,
                severity,
                estimated_recovery_days,
                actual_recovery_days,
                notes,
                estimated_missed_matches,
                is_active,
                ended_on,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(injury.injury_id.as_uuid())
        .bind(injury.player_id.as_uuid())
        .bind(injury.injured_on)
        .bind(&injury.diagnosis)
        .bind(injury.injury_type.code())
        .bind(injury.body_region.code())
        .bind(injury.mechanism.code())
        .bind(injury.condition.code())
        .bind(injury.sport_stage.code())
        .bind(injury.severity.code())
        .bind(injury.estimated_recovery_days)
        .bind(injury.actual_recovery_days)
        .bind(injury.notes.as_deref())
        .bind(injury.estimated_missed_matches)
        .bind(injury.is_active)
        .bind(injury.ended_on)
        .bind(injury.created_at)
        .bind(injury.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_injury(&self, injury_id: &InjuryId) -> ClinicResult<Option<Injury>> {
        let sql = format!("SELECT {INJURY_COLUMNS} FROM injuries WHERE injury_id = $1");
        let row = sqlx::query_as::<_, InjuryRow>(&sql)
            .bind(injury_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(InjuryRow::into_injury).transpose()
    }

    async fn list_injuries(&self, filter: &InjuryFilter) -> ClinicResult<Vec<Injury>> {
        let sql = format!(
            r#"
            SELECT {INJURY_COLUMNS} FROM injuries
            WHERE ($1::uuid IS NULL OR player_id = $1)
              AND ($2::text IS NULL OR injury_type = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
            ORDER BY injured_on DESC, created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, InjuryRow>(&sql)
            .bind(filter.player_id.map(PlayerId::into_uuid))
            .bind(filter.injury_type.map(InjuryType::code))
            .bind(filter.active)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(InjuryRow::into_injury).collect()
    }

    async fn update_injury(&self, injury: &Injury) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE injuries SET
                injured_on = $2,
                diagnosis = $3,
                injury_type = $4,
                body_region = $5,
                mechanism = $6,
                condition = $7,
                sport_stage = $8,
                severity = $9,
                estimated_recovery_days = $10,
                actual_recovery_days = $11,
                notes = $12,
                estimated_missed_matches = $13,
                is_active = $14,
                ended_on = $15,
                updated_at = $16
            WHERE injury_id = $1
            "#,
        )
        .bind(injury.injury_id.as_uuid())
        .bind(injury.injured_on)
        .bind(&injury.diagnosis)
        .bind(injury.injury_type.code())
        .bind(injury.body_region.code())
        .bind(injury.mechanism.code())
        .bind(injury.condition.code())
        .bind(injury.sport_stage.code())
        .bind(injury.severity.code())
        .bind(injury.estimated_recovery_days)
        .bind(injury.actual_recovery_days)
        .bind(injury.notes.as_deref())
        .bind(injury.estimated_missed_matches)
        .bind(injury.is_active)
        .bind(injury.ended_on)
        .bind(injury.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_injury(&self, injury_id: &InjuryId) -> ClinicResult<bool> {
        let deleted = sqlx::query("DELETE FROM injuries WHERE injury_id = $1")
            .bind(injury_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn create_daily_status(&self, status: &InjuryDailyStatus) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO injury_daily_status (
                status_id,
                injury_id,
                date,
                phase,
                recorded_by,
                notes,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(status.status_id.as_uuid())
        .bind(status.injury_id.as_uuid())
        .bind(status.date)
        .bind(status.phase.code())
        .bind(status.recorded_by.map(AccountId::into_uuid))
        .bind(status.notes.as_deref())
        .bind(status.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn daily_status_exists(
        &self,
        injury_id: &InjuryId,
        date: NaiveDate,
    ) -> ClinicResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM injury_daily_status WHERE injury_id = $1 AND date = $2)",
        )
        .bind(injury_id.as_uuid())
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_daily_statuses(
        &self,
        injury_id: &InjuryId,
    ) -> ClinicResult<Vec<InjuryDailyStatus>> {
        let rows = sqlx::query_as::<_, DailyStatusRow>(
            r#"
            SELECT status_id, injury_id, date, phase, recorded_by, notes, created_at
            FROM injury_daily_status
            WHERE injury_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(injury_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DailyStatusRow::into_status).collect()
    }
}

#[derive(sqlx::FromRow)]
struct InjuryRow {
    injury_id: Uuid,
    player_id: Uuid,
    injured_on: NaiveDate,
    diagnosis: String,
    injury_type: String,
    body_region: String,
    mechanism: String,
    condition: String,
    sport_stage: String,
    severity: String,
    estimated_recovery_days: Option<i32>,
    actual_recovery_days: Option<i32>,
    notes: Option<String>,
    estimated_missed_matches: Option<i32>,
    is_active: bool,
    ended_on: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InjuryRow {
    fn into_injury(self) -> ClinicResult<Injury> {
        Ok(Injury {
            injury_id: InjuryId::from_uuid(self.injury_id),
            player_id: PlayerId::from_uuid(self.player_id),
            injured_on: self.injured_on,
            diagnosis: self.diagnosis,
            injury_type: choice(&self.injury_type, "injury_type", InjuryType::from_code)?,
            body_region: choice(&self.body_region, "body_region", BodyRegion::from_code)?,
            mechanism: choice(&self.mechanism, "mechanism", InjuryMechanism::from_code)?,
            condition: choice(&self.condition, "condition", InjuryCondition::from_code)?,
            sport_stage: choice(&self.sport_stage, "sport_stage", SportStage::from_code)?,
            severity: choice(&self.severity, "severity", Severity::from_code)?,
            estimated_recovery_days: self.estimated_recovery_days,
            actual_recovery_days: self.actual_recovery_days,
            notes: self.notes,
            estimated_missed_matches: self.estimated_missed_matches,
            is_active: self.is_active,
            ended_on: self.ended_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DailyStatusRow {
    status_id: Uuid,
    injury_id: Uuid,
    date: NaiveDate,
    phase: String,
    recorded_by: Option<Uuid>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl DailyStatusRow {
    fn into_status(self) -> ClinicResult<InjuryDailyStatus> {
        Ok(InjuryDailyStatus {
            status_id: InjuryDailyStatusId::from_uuid(self.status_id),
            injury_id: InjuryId::from_uuid(self.injury_id),
            date: self.date,
            phase: choice(&self.phase, "phase", DailyPhase::from_code)?,
            recorded_by: self.recorded_by.map(AccountId::from_uuid),
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}
