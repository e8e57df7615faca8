//! Match Use Cases
//!
//! Fixtures and their call-up lists.

use std::sync::Arc;

use auth::CurrentUser;
use chrono::NaiveDate;
use kernel::id::{MatchId, PlayerId};

use crate::application::config::ClinicConfig;
use crate::domain::choices::Venue;
use crate::domain::entity::matches::{Match, dedup_call_ups};
use crate::domain::entity::player::Player;
use crate::domain::repository::{ClinicStore, MatchFilter};
use crate::domain::text;
use crate::error::{ClinicError, ClinicResult};

const MAX_OPPONENT_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct MatchInput {
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: Venue,
    pub call_ups: Vec<PlayerId>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMatchInput {
    pub date: Option<NaiveDate>,
    pub opponent: Option<String>,
    pub venue: Option<Venue>,
}

pub struct MatchesUseCase<R: ClinicStore> {
    repo: Arc<R>,
    config: Arc<ClinicConfig>,
}

impl<R: ClinicStore> MatchesUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<ClinicConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn list(&self, _actor: &CurrentUser, filter: &MatchFilter) -> ClinicResult<Vec<Match>> {
        self.repo.list_matches(filter).await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &MatchId) -> ClinicResult<Match> {
        self.find(id).await
    }

    pub async fn create(&self, actor: &CurrentUser, input: MatchInput) -> ClinicResult<Match> {
        actor.ensure_can_write()?;
        let opponent = text::required(&input.opponent, "opponent", MAX_OPPONENT_LEN)?;
        let call_ups = self.check_call_ups(input.call_ups).await?;

        let mut m = Match::new(input.date, opponent, input.venue);
        m.call_ups = call_ups;
        self.repo.create_match(&m).await?;

        tracing::info!(
            match_id = %m.match_id,
            date = %m.date,
            opponent = %m.opponent,
            call_ups = m.call_ups.len(),
            "Match created"
        );
        Ok(m)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &MatchId,
        input: UpdateMatchInput,
    ) -> ClinicResult<Match> {
        actor.ensure_can_write()?;
        let mut m = self.find(id).await?;
        if let Some(date) = input.date {
            m.date = date;
        }
        if let Some(opponent) = input.opponent {
            m.opponent = text::required(&opponent, "opponent", MAX_OPPONENT_LEN)?;
        }
        if let Some(venue) = input.venue {
            m.venue = venue;
        }
        m.touch();
        self.repo.update_match(&m).await?;
        Ok(m)
    }

    /// Replace the call-up list
    pub async fn set_call_ups(
        &self,
        actor: &CurrentUser,
        id: &MatchId,
        players: Vec<PlayerId>,
    ) -> ClinicResult<Match> {
        actor.ensure_can_write()?;
        let mut m = self.find(id).await?;
        let call_ups = self.check_call_ups(players).await?;

        self.repo.set_call_ups(id, &call_ups).await?;
        m.call_ups = call_ups;

        tracing::info!(match_id = %id, call_ups = m.call_ups.len(), "Call-ups updated");
        Ok(m)
    }

    pub async fn call_ups(&self, _actor: &CurrentUser, id: &MatchId) -> ClinicResult<Vec<Player>> {
        self.find(id).await?;
        self.repo.list_call_up_players(id).await
    }

    /// Also deletes the checklists filed for the match
    pub async fn delete(&self, actor: &CurrentUser, id: &MatchId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        if !self.repo.delete_match(id).await? {
            return Err(ClinicError::NotFound("Match"));
        }
        tracing::info!(match_id = %id, by = %actor.public_id, "Match deleted");
        Ok(())
    }

    async fn check_call_ups(&self, players: Vec<PlayerId>) -> ClinicResult<Vec<PlayerId>> {
        let players = dedup_call_ups(players);
        if players.len() > self.config.max_call_ups {
            return Err(ClinicError::rule(
                Some("callUps"),
                format!("At most {} players can be called up", self.config.max_call_ups),
            ));
        }
        let existing = self.repo.existing_player_ids(&players).await?;
        if existing.len() != players.len() {
            return Err(ClinicError::invalid("callUps", "Unknown player in call-up list"));
        }
        Ok(players)
    }

    async fn find(&self, id: &MatchId) -> ClinicResult<Match> {
        self.repo
            .find_match(id)
            .await?
            .ok_or(ClinicError::NotFound("Match"))
    }
}
