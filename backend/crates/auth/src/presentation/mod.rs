//! Presentation Layer
//!
//! HTTP handlers, forms, router, and middleware.

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{check_auth_session, require_admin};
pub use router::auth_router;
