//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use std::future::Future;

use crate::domain::entities::{Entity, ManagementMember, Project, Sponsor, Team};
use crate::domain::value_objects::{EntityId, ImageRef};
use crate::error::ContentResult;

/// CRUD contract shared by every content entity
///
/// Listing order is part of the contract, see
/// [`sort_for_listing`](crate::domain::entities::sort_for_listing).
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Insert a record; the id is assigned by the store
    fn create(
        &self,
        fields: &E::Fields,
        image: Option<&ImageRef>,
    ) -> impl Future<Output = ContentResult<EntityId<E>>> + Send;

    fn get(&self, id: EntityId<E>) -> impl Future<Output = ContentResult<Option<E>>> + Send;

    fn list(&self) -> impl Future<Output = ContentResult<Vec<E>>> + Send;

    /// Overwrite the fields; `image = None` keeps the stored reference
    fn update(
        &self,
        id: EntityId<E>,
        fields: &E::Fields,
        image: Option<&ImageRef>,
    ) -> impl Future<Output = ContentResult<Option<E>>> + Send;

    /// Remove a record, returning it so its image can be released
    fn delete(&self, id: EntityId<E>) -> impl Future<Output = ContentResult<Option<E>>> + Send;
}

/// Store holding every kind of content
pub trait ContentRepository:
    EntityRepository<Sponsor>
    + EntityRepository<ManagementMember>
    + EntityRepository<Team>
    + EntityRepository<Project>
    + Clone
    + 'static
{
}

impl<T> ContentRepository for T where
    T: EntityRepository<Sponsor>
        + EntityRepository<ManagementMember>
        + EntityRepository<Team>
        + EntityRepository<Project>
        + Clone
        + 'static
{
}
