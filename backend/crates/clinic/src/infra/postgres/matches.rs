use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{MatchId, PlayerId};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::players::{PLAYER_COLUMNS, PlayerRow};
use super::{PgClinicRepository, choice};
use crate::domain::choices::Venue;
use crate::domain::entity::matches::Match;
use crate::domain::entity::player::Player;
use crate::domain::repository::{MatchFilter, MatchRepository};
use crate::error::ClinicResult;

const MATCH_COLUMNS: &str = "match_id, date, opponent, venue, created_at, updated_at";

impl PgClinicRepository {
    /// Call-ups of several matches, in call-up order
    async fn call_ups_for(&self, match_ids: &[Uuid]) -> ClinicResult<HashMap<Uuid, Vec<PlayerId>>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            SELECT match_id, player_id FROM match_call_ups
            WHERE match_id = ANY($1)
            ORDER BY match_id, call_order
            "#,
        )
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<PlayerId>> = HashMap::new();
        for (match_id, player_id) in rows {
            grouped
                .entry(match_id)
                .or_default()
                .push(PlayerId::from_uuid(player_id));
        }
        Ok(grouped)
    }
}

async fn insert_call_ups(
    tx: &mut Transaction<'_, Postgres>,
    match_id: &MatchId,
    players: &[PlayerId],
) -> ClinicResult<()> {
    let uuids: Vec<Uuid> = players.iter().map(|id| id.into_uuid()).collect();
    sqlx::query(
        r#"
        INSERT INTO match_call_ups (match_id, player_id, call_order)
        SELECT $1, player_id, ordinality::int
        FROM UNNEST($2::uuid[]) WITH ORDINALITY AS t(player_id, ordinality)
        "#,
    )
    .bind(match_id.as_uuid())
    .bind(uuids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

impl MatchRepository for PgClinicRepository {
    async fn create_match(&self, m: &Match) -> ClinicResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO matches (match_id, date, opponent, venue, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(m.match_id.as_uuid())
        .bind(m.date)
        .bind(&m.opponent)
        .bind(m.venue.code())
        .bind(m.created_at)
        .bind(m.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_call_ups(&mut tx, &m.match_id, &m.call_ups).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn find_match(&self, match_id: &MatchId) -> ClinicResult<Option<Match>> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = $1");
        let Some(row) = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(match_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut call_ups = self.call_ups_for(&[row.match_id]).await?;
        let players = call_ups.remove(&row.match_id).unwrap_or_default();
        row.into_match(players).map(Some)
    }

    async fn list_matches(&self, filter: &MatchFilter) -> ClinicResult<Vec<Match>> {
        let sql = format!(
            r#"
            SELECT {MATCH_COLUMNS} FROM matches
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.match_id).collect();
        let mut call_ups = self.call_ups_for(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let players = call_ups.remove(&row.match_id).unwrap_or_default();
                row.into_match(players)
            })
            .collect()
    }

    async fn update_match(&self, m: &Match) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE matches SET
                date = $2,
                opponent = $3,
                venue = $4,
                updated_at = $5
            WHERE match_id = $1
            "#,
        )
        .bind(m.match_id.as_uuid())
        .bind(m.date)
        .bind(&m.opponent)
        .bind(m.venue.code())
        .bind(m.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_call_ups(&self, match_id: &MatchId, players: &[PlayerId]) -> ClinicResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM match_call_ups WHERE match_id = $1")
            .bind(match_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        insert_call_ups(&mut tx, match_id, players).await?;
        sqlx::query("UPDATE matches SET updated_at = $2 WHERE match_id = $1")
            .bind(match_id.as_uuid())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_call_up_players(&self, match_id: &MatchId) -> ClinicResult<Vec<Player>> {
        let sql = format!(
            r#"
            SELECT {PLAYER_COLUMNS} FROM players p
            JOIN match_call_ups c ON c.player_id = p.player_id
            WHERE c.match_id = $1
            ORDER BY p.last_names, p.first_names
            "#
        );
        let rows = sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(match_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PlayerRow::into_player).collect()
    }

    async fn delete_match(&self, match_id: &MatchId) -> ClinicResult<bool> {
        // Call-ups and checklists cascade
        let deleted = sqlx::query("DELETE FROM matches WHERE match_id = $1")
            .bind(match_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[derive(sqlx::FromRow)]
struct MatchRow {
    match_id: Uuid,
    date: NaiveDate,
    opponent: String,
    venue: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MatchRow {
    fn into_match(self, call_ups: Vec<PlayerId>) -> ClinicResult<Match> {
        Ok(Match {
            match_id: MatchId::from_uuid(self.match_id),
            date: self.date,
            opponent: self.opponent,
            venue: choice(&self.venue, "venue", Venue::from_code)?,
            call_ups,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
