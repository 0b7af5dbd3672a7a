//! Auth Session Entity
//!
//! Server-side session row referenced by the signed session cookie.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::user_id::UserId;

#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    pub user_id: UserId,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_live() {
        let session = AuthSession::new(UserId::new(1), Duration::hours(12));
        assert!(!session.is_expired());
        assert!(session.remaining_ms() > 11 * 3600 * 1000);
        assert_eq!(session.session_id.get_version_num(), 4);
    }

    #[test]
    fn test_expired_session() {
        let mut session = AuthSession::new(UserId::new(1), Duration::hours(12));
        session.expires_at_ms = Utc::now().timestamp_millis() - 1;
        assert!(session.is_expired());
        assert_eq!(session.remaining_ms(), 0);
    }
}
