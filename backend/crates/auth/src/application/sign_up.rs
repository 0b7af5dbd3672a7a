//! Sign Up Use Case
//!
//! Creates a new user account. Only reachable by an authenticated admin.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};
use kernel::validation::FieldErrors;

/// Sign up input (already passed the register form rules)
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub name: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(input.email).map_err(|e| {
            AuthError::Validation(FieldErrors::single("email", e.message().to_string()))
        })?;

        // Pre-check gives a clean message; the unique index still decides races
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password, self.config.password_policy)
            .map_err(|e| {
                AuthError::Validation(FieldErrors::single("password", e.message().to_string()))
            })?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let new_user = NewUser::new(input.name, email, password_hash);
        let user_id = self.user_repo.create(&new_user).await?;

        tracing::info!(
            user_id = %user_id,
            email = %new_user.email,
            "User registered"
        );

        Ok(SignUpOutput {
            user_id,
            name: new_user.name,
        })
    }
}
