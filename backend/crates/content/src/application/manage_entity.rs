//! Manage Entity Use Case
//!
//! Create, read, update and delete for one entity kind, keeping image files
//! and records consistent:
//! - a record never points at an image that was not written
//! - a failed record write removes the image it just stored
//! - replaced and deleted images are removed best-effort

use std::marker::PhantomData;
use std::sync::Arc;

use kernel::validation::{ImageFormat, UploadedFile};

use crate::domain::{Entity, EntityId, EntityRepository, ImageRef, ImageStore};
use crate::error::{ContentError, ContentResult};

pub struct ManageEntityUseCase<E, R, I>
where
    E: Entity,
    R: EntityRepository<E>,
    I: ImageStore + Sync,
{
    repo: Arc<R>,
    images: Arc<I>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R, I> ManageEntityUseCase<E, R, I>
where
    E: Entity,
    R: EntityRepository<E>,
    I: ImageStore + Sync,
{
    pub fn new(repo: Arc<R>, images: Arc<I>) -> Self {
        Self {
            repo,
            images,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> ContentResult<Vec<E>> {
        self.repo.list().await
    }

    /// Missing records become [`ContentError::NotFound`]
    pub async fn get(&self, id: EntityId<E>) -> ContentResult<E> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ContentError::not_found(id))
    }

    pub async fn create(
        &self,
        fields: E::Fields,
        upload: Option<UploadedFile>,
    ) -> ContentResult<EntityId<E>> {
        let image = match (E::KIND.has_image(), upload) {
            (true, Some(upload)) => Some(self.store_image(&upload).await?),
            (true, None) => return Err(ContentError::ImageRequired),
            (false, _) => None,
        };

        let id = match self.repo.create(&fields, image.as_ref()).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(image) = &image {
                    self.release_image(image).await;
                }
                return Err(e);
            }
        };

        tracing::info!(entity = E::KIND.slug(), id = %id, "Content created");
        Ok(id)
    }

    /// Without a new upload the stored image is kept as is
    pub async fn update(
        &self,
        id: EntityId<E>,
        fields: E::Fields,
        upload: Option<UploadedFile>,
    ) -> ContentResult<E> {
        let existing = self.get(id).await?;

        let new_image = match upload {
            Some(upload) if E::KIND.has_image() => Some(self.store_image(&upload).await?),
            _ => None,
        };

        let updated = match self.repo.update(id, &fields, new_image.as_ref()).await {
            Ok(Some(updated)) => updated,
            result => {
                // Written image belongs to no record
                if let Some(image) = &new_image {
                    self.release_image(image).await;
                }
                return match result {
                    Err(e) => Err(e),
                    _ => Err(ContentError::not_found(id)),
                };
            }
        };

        if let (Some(_), Some(old)) = (&new_image, existing.image()) {
            self.release_image(old).await;
        }

        tracing::info!(
            entity = E::KIND.slug(),
            id = %id,
            image_replaced = new_image.is_some(),
            "Content updated"
        );
        Ok(updated)
    }

    /// Delete the record, then reclaim its image
    pub async fn delete(&self, id: EntityId<E>) -> ContentResult<E> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| ContentError::not_found(id))?;

        if let Some(image) = removed.image() {
            self.release_image(image).await;
        }

        tracing::info!(entity = E::KIND.slug(), id = %id, "Content deleted");
        Ok(removed)
    }

    /// Bytes of the entity's image
    pub async fn read_image(&self, entity: &E) -> ContentResult<Option<Vec<u8>>> {
        match entity.image() {
            Some(image) => Ok(Some(self.images.read(image).await?)),
            None => Ok(None),
        }
    }

    async fn store_image(&self, upload: &UploadedFile) -> ContentResult<ImageRef> {
        let declared = ImageFormat::from_file_name(&upload.file_name);
        let sniffed = ImageFormat::sniff(&upload.bytes);
        if sniffed.is_none() || (declared.is_some() && declared != sniffed) {
            return Err(ContentError::UnsupportedImage);
        }
        self.images.save(upload).await
    }

    async fn release_image(&self, image: &ImageRef) {
        if let Err(e) = self.images.remove(image).await {
            tracing::warn!(image = %image, error = %e, "Failed to remove image file");
        }
    }
}
