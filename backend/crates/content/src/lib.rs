//! Content Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and image store traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL, filesystem and in-memory implementations
//! - `presentation/` - Forms, HTTP handlers, routers
//!
//! ## Content
//! - Sponsors (logo, optional website), shown in the footer of every page
//! - Management members and teams, listed by their `order`
//! - Projects
//!
//! ## Images
//! - Stored as files under the upload directory, referenced by file name
//! - jpg/jpeg/png only, checked by extension and content
//! - Reclaimed when replaced or when the record is deleted

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ContentConfig;
pub use error::{ContentError, ContentResult};
pub use infra::{FsImageStore, MemoryContentRepository, MemoryImageStore, PgContentRepository};
pub use presentation::{ContentAppState, admin_router, public_router};

#[cfg(test)]
mod tests;
