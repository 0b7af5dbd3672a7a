//! In-memory repository and image store
//!
//! Same contracts as [`super::PgContentRepository`] and
//! [`super::FsImageStore`], for tests and local runs without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use kernel::validation::{ImageFormat, UploadedFile};
use platform::upload::stored_file_name;
use tokio::sync::RwLock;

use crate::domain::entities::sort_for_listing;
use crate::domain::{
    Entity, EntityId, EntityRepository, ImageRef, ImageStore, ManagementMember, Project, Sponsor,
    Team,
};
use crate::error::{ContentError, ContentResult};

// ============================================================================
// Repository
// ============================================================================

/// Builds a record the way an `INSERT` would
pub trait Assemble: Entity {
    fn assemble(
        id: EntityId<Self>,
        fields: Self::Fields,
        image: Option<ImageRef>,
    ) -> ContentResult<Self>;
}

impl Assemble for Sponsor {
    fn assemble(
        id: EntityId<Self>,
        fields: Self::Fields,
        image: Option<ImageRef>,
    ) -> ContentResult<Self> {
        Ok(Sponsor::new(id, fields, image.ok_or(ContentError::ImageRequired)?))
    }
}

impl Assemble for ManagementMember {
    fn assemble(
        id: EntityId<Self>,
        fields: Self::Fields,
        _image: Option<ImageRef>,
    ) -> ContentResult<Self> {
        Ok(ManagementMember::new(id, fields))
    }
}

impl Assemble for Team {
    fn assemble(
        id: EntityId<Self>,
        fields: Self::Fields,
        image: Option<ImageRef>,
    ) -> ContentResult<Self> {
        Ok(Team::new(id, fields, image.ok_or(ContentError::ImageRequired)?))
    }
}

impl Assemble for Project {
    fn assemble(
        id: EntityId<Self>,
        fields: Self::Fields,
        image: Option<ImageRef>,
    ) -> ContentResult<Self> {
        Ok(Project::new(id, fields, image.ok_or(ContentError::ImageRequired)?))
    }
}

#[doc(hidden)]
pub struct Table<E> {
    next_id: i64,
    rows: BTreeMap<i64, E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

/// One table per entity kind
#[doc(hidden)]
#[derive(Default)]
pub struct MemoryTables {
    sponsors: Table<Sponsor>,
    management: Table<ManagementMember>,
    teams: Table<Team>,
    projects: Table<Project>,
}

/// Selects the table of an entity kind
pub trait TableOf: Assemble {
    fn table(state: &mut MemoryTables) -> &mut Table<Self>;
}

impl TableOf for Sponsor {
    fn table(state: &mut MemoryTables) -> &mut Table<Self> {
        &mut state.sponsors
    }
}

impl TableOf for ManagementMember {
    fn table(state: &mut MemoryTables) -> &mut Table<Self> {
        &mut state.management
    }
}

impl TableOf for Team {
    fn table(state: &mut MemoryTables) -> &mut Table<Self> {
        &mut state.teams
    }
}

impl TableOf for Project {
    fn table(state: &mut MemoryTables) -> &mut Table<Self> {
        &mut state.projects
    }
}

/// In-memory content repository; clones share the same storage
#[derive(Clone, Default)]
pub struct MemoryContentRepository {
    state: Arc<RwLock<MemoryTables>>,
}

impl MemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: TableOf> EntityRepository<E> for MemoryContentRepository {
    async fn create(
        &self,
        fields: &E::Fields,
        image: Option<&ImageRef>,
    ) -> ContentResult<EntityId<E>> {
        let mut state = self.state.write().await;
        let table = E::table(&mut state);

        let id = EntityId::new(table.next_id + 1);
        let entity = E::assemble(id, fields.clone(), image.cloned())?;
        table.next_id = id.get();
        table.rows.insert(id.get(), entity);
        Ok(id)
    }

    async fn get(&self, id: EntityId<E>) -> ContentResult<Option<E>> {
        let mut state = self.state.write().await;
        Ok(E::table(&mut state).rows.get(&id.get()).cloned())
    }

    async fn list(&self) -> ContentResult<Vec<E>> {
        let mut state = self.state.write().await;
        let mut items: Vec<E> = E::table(&mut state).rows.values().cloned().collect();
        sort_for_listing(&mut items);
        Ok(items)
    }

    async fn update(
        &self,
        id: EntityId<E>,
        fields: &E::Fields,
        image: Option<&ImageRef>,
    ) -> ContentResult<Option<E>> {
        let mut state = self.state.write().await;
        let Some(entity) = E::table(&mut state).rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        entity.apply(fields.clone(), image.cloned());
        Ok(Some(entity.clone()))
    }

    async fn delete(&self, id: EntityId<E>) -> ContentResult<Option<E>> {
        let mut state = self.state.write().await;
        Ok(E::table(&mut state).rows.remove(&id.get()))
    }
}

// ============================================================================
// Image store
// ============================================================================

/// Image store keeping bytes in memory; clones share the same files
#[derive(Clone, Default)]
pub struct MemoryImageStore {
    files: Arc<RwLock<BTreeMap<ImageRef, Vec<u8>>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    pub async fn contains(&self, image: &ImageRef) -> bool {
        self.files.read().await.contains_key(image)
    }
}

impl ImageStore for MemoryImageStore {
    async fn save(&self, upload: &UploadedFile) -> ContentResult<ImageRef> {
        let ext = match ImageFormat::sniff(&upload.bytes) {
            Some(ImageFormat::Png) => "png",
            _ => "jpg",
        };
        let image = ImageRef::parse(stored_file_name(&upload.file_name, ext))?;
        self.files
            .write()
            .await
            .insert(image.clone(), upload.bytes.clone());
        Ok(image)
    }

    async fn read(&self, image: &ImageRef) -> ContentResult<Vec<u8>> {
        self.files
            .read()
            .await
            .get(image)
            .cloned()
            .ok_or_else(|| {
                ContentError::storage("read image")(std::io::Error::from(
                    std::io::ErrorKind::NotFound,
                ))
            })
    }

    async fn remove(&self, image: &ImageRef) -> ContentResult<()> {
        if self.files.write().await.remove(image).is_none() {
            tracing::debug!(image = %image, "Image already gone");
        }
        Ok(())
    }
}
