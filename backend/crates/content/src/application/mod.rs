//! Application Layer - Use Cases
//!
//! This layer orchestrates the entity repositories and the image store.

pub mod config;
pub mod manage_entity;

pub use config::ContentConfig;
pub use manage_entity::ManageEntityUseCase;
