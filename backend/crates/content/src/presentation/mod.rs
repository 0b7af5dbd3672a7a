//! Presentation Layer
//!
//! Forms, HTTP handlers and routers.

pub mod admin;
pub mod forms;
pub mod handlers;
pub mod router;

pub use handlers::{ContentAppState, SharedImageStore};
pub use router::{admin_router, public_router};
