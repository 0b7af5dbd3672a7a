//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    user::{NewUser, User},
};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult, is_unique_violation};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::EmailTaken
            } else {
                AuthError::Database(e)
            }
        })?;

        Ok(UserId::new(id))
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash FROM users WHERE id = $1",
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count(&self) -> AuthResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn update(
        &self,
        user_id: UserId,
        name: Option<&str>,
        password_hash: Option<&UserPassword>,
    ) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(user_id.get())
        .bind(name)
        .bind(password_hash.map(|h| h.as_phc_string()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn delete(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "DELETE FROM users WHERE id = $1 RETURNING id, name, email, password_hash",
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAuthRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.get())
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT session_id, user_id, expires_at_ms, created_at
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthSessionRow::into_session))
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(User {
            user_id: UserId::new(self.id),
            name: self.name,
            email: Email::from_db(self.email),
            password_hash,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: i64,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            user_id: UserId::new(self.user_id),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
