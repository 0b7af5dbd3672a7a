//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - Forms, HTTP handlers, middleware, router
//!
//! ## Features
//! - Administrator accounts identified by email + password
//! - Registration of further administrators by a signed-in administrator
//! - Server-side sessions with signed cookie tokens
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, never stored or logged in clear
//! - Session tokens are HMAC-signed session ids; the row is the authority
//! - Failed logins report one generic message

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{BootstrapAdminInput, BootstrapAdminUseCase, CurrentUser};
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryAuthRepository, PgAuthRepository};
pub use presentation::{AuthAppState, auth_router, check_auth_session, require_admin};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
