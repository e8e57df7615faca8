//! Auth Session Entity
//!
//! Server-side session. The client holds a signed token that references
//! `session_id`; nothing else about the account travels in the token.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::AccountId;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
    /// Client IP (optional, for the audit trail)
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(
        account_id: AccountId,
        client_ip: Option<String>,
        user_agent: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            account_id,
            expires_at: now + ttl,
            client_ip,
            user_agent,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Seconds until expiration, never negative
    pub fn remaining_secs(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let session = AuthSession::new(AccountId::new(), None, None, Duration::hours(12));
        assert!(!session.is_expired());
        assert!(session.remaining_secs() > 11 * 3600);

        let expired = AuthSession::new(AccountId::new(), None, None, Duration::seconds(-1));
        assert!(expired.is_expired());
        assert_eq!(expired.remaining_secs(), 0);
    }
}
