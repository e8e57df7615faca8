use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ChecklistId, MatchId, PlayerId};
use uuid::Uuid;

use super::{PgClinicRepository, optional_choice};
use crate::domain::choices::{PainIntensity, PainMechanism, PainOnset, PainZone};
use crate::domain::entity::checklist::{Checklist, PainDetail};
use crate::domain::repository::{ChecklistFilter, ChecklistRepository};
use crate::error::ClinicResult;

const CHECKLIST_COLUMNS: &str = r#"
    c.checklist_id,
    c.player_id,
    c.match_id,
    c.filed_by,
    c.pain,
    c.pain_intensity,
    c.pain_mechanism,
    c.pain_onset,
    c.pain_zone,
    c.presumptive_diagnosis,
    c.immediate_treatment,
    c.notes,
    c.created_at,
    c.updated_at
"#;

impl ChecklistRepository for PgClinicRepository {
    async fn create_checklist(&self, checklist: &Checklist) -> ClinicResult<()> {
        let detail = &checklist.pain_detail;
        sqlx::query(
            r#"
            INSERT INTO checklists (
                checklist_id,
                player_id,
                match_id,
                filed_by,
                pain,
                pain_intensity,
                pain_mechanism,
                pain_onset,
                pain_zone,
                presumptive_diagnosis,
                immediate_treatment,
                notes,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(checklist.checklist_id.as_uuid())
        .bind(checklist.player_id.as_uuid())
        .bind(checklist.match_id.as_uuid())
        .bind(checklist.filed_by.map(AccountId::into_uuid))
        .bind(checklist.pain)
        .bind(detail.intensity.map(PainIntensity::code))
        .bind(detail.mechanism.map(PainMechanism::code))
        .bind(detail.onset.map(PainOnset::code))
        .bind(detail.zone.map(PainZone::code))
        .bind(checklist.presumptive_diagnosis.as_deref())
        .bind(checklist.immediate_treatment.as_deref())
        .bind(checklist.notes.as_deref())
        .bind(checklist.created_at)
        .bind(checklist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_checklist(&self, checklist_id: &ChecklistId) -> ClinicResult<Option<Checklist>> {
        let sql = format!("SELECT {CHECKLIST_COLUMNS} FROM checklists c WHERE c.checklist_id = $1");
        let row = sqlx::query_as::<_, ChecklistRow>(&sql)
            .bind(checklist_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ChecklistRow::into_checklist).transpose()
    }

    async fn find_checklist_for(
        &self,
        player_id: &PlayerId,
        match_id: &MatchId,
    ) -> ClinicResult<Option<Checklist>> {
        let sql = format!(
            "SELECT {CHECKLIST_COLUMNS} FROM checklists c WHERE c.player_id = $1 AND c.match_id = $2"
        );
        let row = sqlx::query_as::<_, ChecklistRow>(&sql)
            .bind(player_id.as_uuid())
            .bind(match_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ChecklistRow::into_checklist).transpose()
    }

    async fn list_checklists(&self, filter: &ChecklistFilter) -> ClinicResult<Vec<Checklist>> {
        let sql = format!(
            r#"
            SELECT {CHECKLIST_COLUMNS} FROM checklists c
            JOIN matches m ON m.match_id = c.match_id
            WHERE ($1::uuid IS NULL OR c.player_id = $1)
              AND ($2::uuid IS NULL OR c.match_id = $2)
              AND ($3::boolean IS NULL OR c.pain = $3)
            ORDER BY m.date DESC, c.created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, ChecklistRow>(&sql)
            .bind(filter.player_id.map(PlayerId::into_uuid))
            .bind(filter.match_id.map(MatchId::into_uuid))
            .bind(filter.pain)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ChecklistRow::into_checklist).collect()
    }

    async fn update_checklist(&self, checklist: &Checklist) -> ClinicResult<()> {
        let detail = &checklist.pain_detail;
        sqlx::query(
            r#"
            UPDATE checklists SET
                pain = $2,
                pain_intensity = $3,
                pain_mechanism = $4,
                pain_onset = $5,
                pain_zone = $6,
                presumptive_diagnosis = $7,
                immediate_treatment = $8,
                notes = $9,
                updated_at = $10
            WHERE checklist_id = $1
            "#,
        )
        .bind(checklist.checklist_id.as_uuid())
        .bind(checklist.pain)
        .bind(detail.intensity.map(PainIntensity::code))
        .bind(detail.mechanism.map(PainMechanism::code))
        .bind(detail.onset.map(PainOnset::code))
        .bind(detail.zone.map(PainZone::code))
        .bind(checklist.presumptive_diagnosis.as_deref())
        .bind(checklist.immediate_treatment.as_deref())
        .bind(checklist.notes.as_deref())
        .bind(checklist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_checklist(&self, checklist_id: &ChecklistId) -> ClinicResult<bool> {
        let deleted = sqlx::query("DELETE FROM checklists WHERE checklist_id = $1")
            .bind(checklist_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ChecklistRow {
    checklist_id: Uuid,
    player_id: Uuid,
    match_id: Uuid,
    filed_by: Option<Uuid>,
    pain: bool,
    pain_intensity: Option<String>,
    pain_mechanism: Option<String>,
    pain_onset: Option<String>,
    pain_zone: Option<String>,
    presumptive_diagnosis: Option<String>,
    immediate_treatment: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChecklistRow {
    fn into_checklist(self) -> ClinicResult<Checklist> {
        let pain_detail = PainDetail {
            intensity: optional_choice(
                self.pain_intensity.as_deref(),
                "pain_intensity",
                PainIntensity::from_code,
            )?,
            mechanism: optional_choice(
                self.pain_mechanism.as_deref(),
                "pain_mechanism",
                PainMechanism::from_code,
            )?,
            onset: optional_choice(self.pain_onset.as_deref(), "pain_onset", PainOnset::from_code)?,
            zone: optional_choice(self.pain_zone.as_deref(), "pain_zone", PainZone::from_code)?,
        };

        Ok(Checklist {
            checklist_id: ChecklistId::from_uuid(self.checklist_id),
            player_id: PlayerId::from_uuid(self.player_id),
            match_id: MatchId::from_uuid(self.match_id),
            filed_by: self.filed_by.map(AccountId::from_uuid),
            pain: self.pain,
            pain_detail,
            presumptive_diagnosis: self.presumptive_diagnosis,
            immediate_treatment: self.immediate_treatment,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
