//! Infrastructure Layer
//!
//! PostgreSQL and in-memory repositories, filesystem and in-memory image
//! stores.

pub mod fs_image_store;
pub mod memory;
pub mod postgres;

pub use fs_image_store::FsImageStore;
pub use memory::{MemoryContentRepository, MemoryImageStore};
pub use postgres::PgContentRepository;
