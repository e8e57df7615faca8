use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PlayerId, TreatmentId};
use uuid::Uuid;

use super::{PgClinicRepository, choice};
use crate::domain::choices::TreatmentStatus;
use crate::domain::entity::treatment::Treatment;
use crate::domain::repository::{TreatmentFilter, TreatmentRepository};
use crate::error::ClinicResult;

const TREATMENT_COLUMNS: &str = r#"
    treatment_id,
    player_id,
    professional_id,
    attended_at,
    reason,
    procedures,
    status,
    notes,
    created_at,
    updated_at
"#;

impl TreatmentRepository for PgClinicRepository {
    async fn create_treatment(&self, treatment: &Treatment) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO treatments (
                treatment_id,
                player_id,
                professional_id,
                attended_at,
                reason,
                procedures,
                status,
                notes,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(treatment.treatment_id.as_uuid())
        .bind(treatment.player_id.as_uuid())
        .bind(treatment.professional_id.map(AccountId::into_uuid))
        .bind(treatment.attended_at)
        .bind(&treatment.reason)
        .bind(&treatment.procedures)
        .bind(treatment.status.code())
        .bind(treatment.notes.as_deref())
        .bind(treatment.created_at)
        .bind(treatment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_treatment(&self, treatment_id: &TreatmentId) -> ClinicResult<Option<Treatment>> {
        let sql = format!("SELECT {TREATMENT_COLUMNS} FROM treatments WHERE treatment_id = $1");
        let row = sqlx::query_as::<_, TreatmentRow>(&sql)
            .bind(treatment_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TreatmentRow::into_treatment).transpose()
    }

    async fn list_treatments(&self, filter: &TreatmentFilter) -> ClinicResult<Vec<Treatment>> {
        let sql = format!(
            r#"
            SELECT {TREATMENT_COLUMNS} FROM treatments
            WHERE ($1::uuid IS NULL OR player_id = $1)
              AND ($2::uuid IS NULL OR professional_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY attended_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, TreatmentRow>(&sql)
            .bind(filter.player_id.map(PlayerId::into_uuid))
            .bind(filter.professional_id.map(AccountId::into_uuid))
            .bind(filter.status.map(TreatmentStatus::code))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TreatmentRow::into_treatment).collect()
    }

    async fn update_treatment(&self, treatment: &Treatment) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE treatments SET
                attended_at = $2,
                reason = $3,
                procedures = $4,
                status = $5,
                notes = $6,
                updated_at = $7
            WHERE treatment_id = $1
            "#,
        )
        .bind(treatment.treatment_id.as_uuid())
        .bind(treatment.attended_at)
        .bind(&treatment.reason)
        .bind(&treatment.procedures)
        .bind(treatment.status.code())
        .bind(treatment.notes.as_deref())
        .bind(treatment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_treatment(&self, treatment_id: &TreatmentId) -> ClinicResult<bool> {
        let deleted = sqlx::query("DELETE FROM treatments WHERE treatment_id = $1")
            .bind(treatment_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[derive(sqlx::FromRow)]
struct TreatmentRow {
    treatment_id: Uuid,
    player_id: Uuid,
    professional_id: Option<Uuid>,
    attended_at: DateTime<Utc>,
    reason: String,
    procedures: String,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TreatmentRow {
    fn into_treatment(self) -> ClinicResult<Treatment> {
        Ok(Treatment {
            treatment_id: TreatmentId::from_uuid(self.treatment_id),
            player_id: PlayerId::from_uuid(self.player_id),
            professional_id: self.professional_id.map(AccountId::from_uuid),
            attended_at: self.attended_at,
            reason: self.reason,
            procedures: self.procedures,
            status: choice(&self.status, "status", TreatmentStatus::from_code)?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
