//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure
//! layer.

use crate::domain::entity::{
    auth_session::AuthSession,
    user::{NewUser, User},
};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::AuthResult;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user and return its assigned id
    ///
    /// Fails with `AuthError::EmailTaken` when the email already exists.
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn count(&self) -> AuthResult<i64>;

    /// All users by id
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Change name and/or password; `None` keeps the stored value
    async fn update(
        &self,
        user_id: UserId,
        name: Option<&str>,
        password_hash: Option<&UserPassword>,
    ) -> AuthResult<Option<User>>;

    /// Remove a user (and, through the foreign key, its sessions)
    async fn delete(&self, user_id: UserId) -> AuthResult<Option<User>>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find a session by ID, expired or not
    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete every expired session, returning how many were removed
    async fn cleanup_expired_sessions(&self) -> AuthResult<u64>;
}
