//! Check Session Use Case
//!
//! Resolves a session cookie to the signed-in user.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Signed-in user, inserted into request extensions by the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub expires_at_ms: i64,
}

/// Check session use case
pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Verify the token and load its user
    ///
    /// An expired session is deleted when encountered.
    pub async fn execute(&self, session_token: &str) -> AuthResult<CurrentUser> {
        let session_id = session_token::verify(&self.config.session_secret, session_token)?;

        let session = self
            .session_repo
            .find_session(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete_session(session_id).await?;
            tracing::debug!(session_id = %session_id, "Expired session removed");
            return Err(AuthError::SessionInvalid);
        }

        // The user may have been deleted after the session was issued
        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        Ok(CurrentUser {
            user_id: user.user_id,
            name: user.name,
            email: user.email.into_db(),
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Anonymous on any failure; storage errors are logged
    pub async fn current(&self, session_token: Option<&str>) -> Option<CurrentUser> {
        let token = session_token?;
        match self.execute(token).await {
            Ok(user) => Some(user),
            Err(AuthError::SessionInvalid) => None,
            Err(e) => {
                e.log();
                None
            }
        }
    }
}
