//! Image Store Trait
//!
//! Uploaded images live outside the database; records keep an [`ImageRef`].

use kernel::validation::UploadedFile;

use crate::domain::value_objects::ImageRef;
use crate::error::ContentResult;

#[trait_variant::make(ImageStore: Send)]
pub trait LocalImageStore {
    /// Store the bytes under a fresh, collision-free name
    async fn save(&self, upload: &UploadedFile) -> ContentResult<ImageRef>;

    async fn read(&self, image: &ImageRef) -> ContentResult<Vec<u8>>;

    /// Delete the file; a missing file is not an error
    async fn remove(&self, image: &ImageRef) -> ContentResult<()>;
}
