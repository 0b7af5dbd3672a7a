//! Sign In Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    /// Session token for cookie
    pub session_token: String,
    pub user_id: UserId,
    pub name: String,
}

impl fmt::Debug for SignInOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInOutput")
            .field("session_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .finish()
    }
}

/// Compared against when the email is unknown, so both failures cost one
/// Argon2 verification
static DUMMY_HASH: LazyLock<Option<UserPassword>> = LazyLock::new(|| {
    UserPassword::from_raw(&RawPassword::candidate("dummy-password".to_string()), None).ok()
});

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignInUseCase<U, S>
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

    /// Unknown email and wrong password both end in
    /// [`AuthError::InvalidCredentials`]; no session is created either way.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let candidate = RawPassword::candidate(input.password);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            if let Some(dummy) = DUMMY_HASH.as_ref() {
                let _ = dummy.verify(&candidate, self.config.pepper());
            }
            tracing::debug!("Sign in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !user.password_hash.verify(&candidate, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;
        let session = AuthSession::new(user.user_id, ttl);

        self.session_repo.create_session(&session).await?;

        let session_token = session_token::sign(&self.config.session_secret, session.session_id);

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user_id: user.user_id,
            name: user.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_hash_rejects_candidates() {
        let dummy = DUMMY_HASH.as_ref().unwrap();
        assert!(!dummy.verify(&RawPassword::candidate("secret".to_string()), None));
        assert!(!dummy.verify(&RawPassword::candidate(String::new()), Some(b"pepper")));
    }
}
