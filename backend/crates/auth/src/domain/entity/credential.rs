//! Credential Entity
//!
//! Password hash and login failure tracking of an account, kept apart from
//! the profile so listing staff never loads a hash.

use chrono::{DateTime, Duration, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::AccountId;

#[derive(Debug, Clone)]
pub struct Credential {
    pub account_id: AccountId,
    pub password_hash: HashedPassword,
    /// Consecutive login failure count
    pub login_failed_count: u16,
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Temporary lockout after too many failures
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Maximum login failures before temporary lockout
    pub const MAX_LOGIN_FAILURES: u16 = 5;
    /// Lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 15;

    pub fn new(account_id: AccountId, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            password_hash,
            login_failed_count: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some_and(|until| Utc::now() < until)
    }

    /// Record a failed login attempt; locks after `MAX_LOGIN_FAILURES`
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count = self.login_failed_count.saturating_add(1);
        self.last_failed_at = Some(now);
        self.updated_at = now;

        if self.login_failed_count >= Self::MAX_LOGIN_FAILURES {
            self.locked_until = Some(now + Duration::minutes(Self::LOCKOUT_MINUTES));
        }
    }

    pub fn reset_failures(&mut self) {
        self.login_failed_count = 0;
        self.last_failed_at = None;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    pub fn update_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        let hash = platform::password::ClearTextPassword::for_verification("secret".into())
            .hash(None)
            .unwrap();
        Credential::new(AccountId::new(), hash)
    }

    #[test]
    fn test_lockout_after_max_failures() {
        let mut cred = credential();
        for _ in 0..Credential::MAX_LOGIN_FAILURES - 1 {
            cred.record_failure();
            assert!(!cred.is_locked());
        }
        cred.record_failure();
        assert!(cred.is_locked());

        cred.reset_failures();
        assert!(!cred.is_locked());
        assert_eq!(cred.login_failed_count, 0);
    }

    #[test]
    fn test_expired_lock_is_not_locked() {
        let mut cred = credential();
        cred.locked_until = Some(Utc::now() - Duration::minutes(1));
        assert!(!cred.is_locked());
    }
}
