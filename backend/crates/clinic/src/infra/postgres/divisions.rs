use chrono::{DateTime, Utc};
use kernel::id::DivisionId;
use uuid::Uuid;

use super::PgClinicRepository;
use crate::domain::entity::division::{Division, DivisionSummary};
use crate::domain::repository::DivisionRepository;
use crate::error::ClinicResult;

impl DivisionRepository for PgClinicRepository {
    async fn create_division(&self, division: &Division) -> ClinicResult<()> {
        sqlx::query("INSERT INTO divisions (division_id, name, created_at) VALUES ($1, $2, $3)")
            .bind(division.division_id.as_uuid())
            .bind(&division.name)
            .bind(division.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_division(&self, division_id: &DivisionId) -> ClinicResult<Option<Division>> {
        let row = sqlx::query_as::<_, DivisionRow>(
            "SELECT division_id, name, created_at FROM divisions WHERE division_id = $1",
        )
        .bind(division_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DivisionRow::into_division))
    }

    async fn list_divisions(&self) -> ClinicResult<Vec<DivisionSummary>> {
        let rows = sqlx::query_as::<_, DivisionSummaryRow>(
            r#"
            SELECT
                d.division_id,
                d.name,
                d.created_at,
                COUNT(p.player_id) FILTER (WHERE p.is_active) AS active_players
            FROM divisions d
            LEFT JOIN players p ON p.division_id = d.division_id
            GROUP BY d.division_id
            ORDER BY d.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DivisionSummary {
                division: Division {
                    division_id: DivisionId::from_uuid(row.division_id),
                    name: row.name,
                    created_at: row.created_at,
                },
                active_players: row.active_players,
            })
            .collect())
    }

    async fn update_division(&self, division: &Division) -> ClinicResult<()> {
        sqlx::query("UPDATE divisions SET name = $2 WHERE division_id = $1")
            .bind(division.division_id.as_uuid())
            .bind(&division.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_division(&self, division_id: &DivisionId) -> ClinicResult<bool> {
        let deleted = sqlx::query("DELETE FROM divisions WHERE division_id = $1")
            .bind(division_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[derive(sqlx::FromRow)]
struct DivisionRow {
    division_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl DivisionRow {
    fn into_division(self) -> Division {
        Division {
            division_id: DivisionId::from_uuid(self.division_id),
            name: self.name,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DivisionSummaryRow {
    division_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    active_players: i64,
}
