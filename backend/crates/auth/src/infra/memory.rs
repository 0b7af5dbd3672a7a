//! In-memory repository
//!
//! Same contract as [`super::PgAuthRepository`], for tests and local runs
//! without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    user::{NewUser, User},
};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
    sessions: BTreeMap<Uuid, AuthSession>,
}

/// In-memory auth repository; clones share the same storage
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<RwLock<State>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        state.next_id += 1;
        let user_id = UserId::new(state.next_id);
        state
            .users
            .insert(user_id.get(), user.clone().into_user(user_id));
        Ok(user_id)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id.get()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| &u.email == email))
    }

    async fn count(&self) -> AuthResult<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn update(
        &self,
        user_id: UserId,
        name: Option<&str>,
        password_hash: Option<&UserPassword>,
    ) -> AuthResult<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&user_id.get()) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let mut state = self.state.write().await;
        let removed = state.users.remove(&user_id.get());
        if removed.is_some() {
            state.sessions.retain(|_, s| s.user_id != user_id);
        }
        Ok(removed)
    }
}

impl AuthSessionRepository for MemoryAuthRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&session.user_id.get()) {
            return Err(AuthError::UserNotFound);
        }
        state.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        Ok(self.state.read().await.sessions.get(&session_id).cloned())
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        self.state.write().await.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - state.sessions.len()) as u64)
    }
}
