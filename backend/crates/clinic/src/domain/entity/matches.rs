//! Match Entity
//!
//! A fixture of the club and the players called up for it. Post-match
//! checklists can only be filed for called-up players.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{MatchId, PlayerId};

use crate::domain::choices::Venue;

/// Largest squad that can be called up for one match
pub const MAX_CALL_UPS: usize = 22;

#[derive(Debug, Clone)]
pub struct Match {
    pub match_id: MatchId,
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: Venue,
    /// Called-up players, without duplicates
    pub call_ups: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn new(date: NaiveDate, opponent: String, venue: Venue) -> Self {
        let now = Utc::now();
        Self {
            match_id: MatchId::new(),
            date,
            opponent,
            venue,
            call_ups: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_called_up(&self, player_id: &PlayerId) -> bool {
        self.call_ups.contains(player_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Drop repeated ids, keeping the first occurrence
pub fn dedup_call_ups(ids: Vec<PlayerId>) -> Vec<PlayerId> {
    let mut out: Vec<PlayerId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
