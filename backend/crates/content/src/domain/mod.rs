//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Sponsor, ManagementMember, Team, Project)
//! - Value objects (ImageRef, typed ids)
//! - Repository and image store traits (interfaces)

pub mod entities;
pub mod image;
pub mod repository;
pub mod value_objects;

pub use entities::{
    Entity, EntityKind, ManagementMember, ManagementMemberFields, Project, ProjectFields, Sponsor,
    SponsorFields, Team, TeamFields,
};
pub use image::ImageStore;
pub use repository::{ContentRepository, EntityRepository};
pub use value_objects::{EntityId, ImageRef};
