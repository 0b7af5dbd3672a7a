//! Bootstrap Admin Use Case
//!
//! Registration is itself protected, so the very first account is created
//! from configuration at startup.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

pub struct BootstrapAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct BootstrapAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> BootstrapAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Create the admin only when no user exists yet
    pub async fn execute(&self, input: BootstrapAdminInput) -> AuthResult<Option<UserId>> {
        let existing = self.user_repo.count().await?;
        if existing > 0 {
            tracing::debug!(users = existing, "Users present, bootstrap skipped");
            return Ok(None);
        }

        let output = SignUpUseCase::new(self.user_repo.clone(), self.config.clone())
            .execute(SignUpInput {
                name: input.name,
                email: input.email,
                password: input.password,
            })
            .await?;

        tracing::info!(user_id = %output.user_id, "Bootstrap admin created");
        Ok(Some(output.user_id))
    }
}
