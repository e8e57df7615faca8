use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{DivisionId, PlayerId};
use kernel::rut::Rut;
use uuid::Uuid;

use super::{PgClinicRepository, choice};
use crate::domain::choices::{HealthInsurance, Laterality};
use crate::domain::entity::player::Player;
use crate::domain::repository::{PlayerFilter, PlayerRepository};
use crate::error::ClinicResult;

pub(super) const PLAYER_COLUMNS: &str = r#"
    p.player_id,
    p.rut,
    p.first_names,
    p.last_names,
    p.birth_date,
    p.nationality,
    p.laterality,
    p.weight_kg,
    p.height_cm,
    p.health_insurance,
    p.record_number,
    p.division_id,
    p.is_active,
    p.photo_path,
    p.created_at,
    p.updated_at
"#;

impl PlayerRepository for PgClinicRepository {
    async fn create_player(&self, player: &Player) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO players (
                player_id,
                rut,
                first_names,
                last_names,
                birth_date,
                nationality,
                laterality,
                weight_kg,
                height_cm,
                health_insurance,
                record_number,
                division_id,
                is_active,
                photo_path,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(player.player_id.as_uuid())
        .bind(player.rut.canonical())
        .bind(&player.first_names)
        .bind(&player.last_names)
        .bind(player.birth_date)
        .bind(&player.nationality)
        .bind(player.laterality.code())
        .bind(player.weight_kg)
        .bind(player.height_cm)
        .bind(player.health_insurance.code())
        .bind(&player.record_number)
        .bind(player.division_id.map(DivisionId::into_uuid))
        .bind(player.is_active)
        .bind(player.photo_path.as_deref())
        .bind(player.created_at)
        .bind(player.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_player(&self, player_id: &PlayerId) -> ClinicResult<Option<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.player_id = $1");
        let row = sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(player_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PlayerRow::into_player).transpose()
    }

    async fn find_player_by_rut(&self, rut: &Rut) -> ClinicResult<Option<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.rut = $1");
        let row = sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(rut.canonical())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PlayerRow::into_player).transpose()
    }

    async fn record_number_taken(
        &self,
        number: &str,
        except: Option<&PlayerId>,
    ) -> ClinicResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM players
                WHERE record_number = $1 AND ($2::uuid IS NULL OR player_id <> $2)
            )
            "#,
        )
        .bind(number)
        .bind(except.map(|id| id.into_uuid()))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn max_record_number(&self) -> ClinicResult<u64> {
        let max = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT MAX(CASE WHEN record_number ~ '^[0-9]{1,18}$' THEN record_number::bigint END)
            FROM players
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(max.unwrap_or(0).max(0) as u64)
    }

    async fn list_players(&self, filter: &PlayerFilter) -> ClinicResult<Vec<Player>> {
        let term = filter.search_term();
        let rut_term = filter.rut_term();

        let sql = format!(
            r#"
            SELECT {PLAYER_COLUMNS} FROM players p
            WHERE ($1::uuid IS NULL OR p.division_id = $1)
              AND ($2::boolean IS NULL OR p.is_active = $2)
              AND (
                $3::text IS NULL
                OR p.first_names ILIKE $3
                OR p.last_names ILIKE $3
                OR p.record_number ILIKE $3
                OR p.rut ILIKE $3
                OR ($4::text IS NOT NULL AND replace(p.rut, '-', '') LIKE $4)
              )
            ORDER BY p.last_names, p.first_names
            "#
        );
        let rows = sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(filter.division_id.map(DivisionId::into_uuid))
            .bind(filter.active)
            .bind(term.map(|t| format!("%{}%", escape_like(&t))))
            .bind(rut_term.map(|t| format!("%{t}%")))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PlayerRow::into_player).collect()
    }

    async fn existing_player_ids(&self, ids: &[PlayerId]) -> ClinicResult<Vec<PlayerId>> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let found = sqlx::query_scalar::<_, Uuid>(
            "SELECT player_id FROM players WHERE player_id = ANY($1)",
        )
        .bind(uuids)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().map(PlayerId::from_uuid).collect())
    }

    async fn update_player(&self, player: &Player) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE players SET
                rut = $2,
                first_names = $3,
                last_names = $4,
                birth_date = $5,
                nationality = $6,
                laterality = $7,
                weight_kg = $8,
                height_cm = $9,
                health_insurance = $10,
                record_number = $11,
                division_id = $12,
                is_active = $13,
                photo_path = $14,
                updated_at = $15
            WHERE player_id = $1
            "#,
        )
        .bind(player.player_id.as_uuid())
        .bind(player.rut.canonical())
        .bind(&player.first_names)
        .bind(&player.last_names)
        .bind(player.birth_date)
        .bind(&player.nationality)
        .bind(player.laterality.code())
        .bind(player.weight_kg)
        .bind(player.height_cm)
        .bind(player.health_insurance.code())
        .bind(&player.record_number)
        .bind(player.division_id.map(DivisionId::into_uuid))
        .bind(player.is_active)
        .bind(player.photo_path.as_deref())
        .bind(player.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_player(&self, player_id: &PlayerId) -> ClinicResult<bool> {
        // Clinical records go with the player through ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM players WHERE player_id = $1")
            .bind(player_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(sqlx::FromRow)]
pub(super) struct PlayerRow {
    player_id: Uuid,
    rut: String,
    first_names: String,
    last_names: String,
    birth_date: NaiveDate,
    nationality: String,
    laterality: String,
    weight_kg: Option<f64>,
    height_cm: Option<i32>,
    health_insurance: String,
    record_number: String,
    division_id: Option<Uuid>,
    is_active: bool,
    photo_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlayerRow {
    pub(super) fn into_player(self) -> ClinicResult<Player> {
        Ok(Player {
            player_id: PlayerId::from_uuid(self.player_id),
            rut: Rut::from_db(&self.rut),
            first_names: self.first_names,
            last_names: self.last_names,
            birth_date: self.birth_date,
            nationality: self.nationality,
            laterality: choice(&self.laterality, "laterality", Laterality::from_code)?,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            health_insurance: choice(
                &self.health_insurance,
                "health_insurance",
                HealthInsurance::from_code,
            )?,
            record_number: self.record_number,
            division_id: self.division_id.map(DivisionId::from_uuid),
            is_active: self.is_active,
            photo_path: self.photo_path,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("valdés"), "valdés");
    }
}
