//! Filesystem image store
//!
//! Files are written flat into the upload directory, which is also served
//! as static files.

use std::io;
use std::path::{Path, PathBuf};

use kernel::validation::{ImageFormat, UploadedFile};
use platform::upload::stored_file_name;
use tokio::io::AsyncWriteExt;

use crate::domain::{ImageRef, ImageStore};
use crate::error::{ContentError, ContentResult};

#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// The directory is created on the first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, image: &ImageRef) -> PathBuf {
        self.root.join(image.as_str())
    }

    async fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        // Never overwrites an existing upload
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }
}

impl ImageStore for FsImageStore {
    async fn save(&self, upload: &UploadedFile) -> ContentResult<ImageRef> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(ContentError::storage("create upload directory"))?;

        let ext = match ImageFormat::sniff(&upload.bytes) {
            Some(ImageFormat::Png) => "png",
            _ => "jpg",
        };
        let image = ImageRef::parse(stored_file_name(&upload.file_name, ext))?;
        let path = self.path_of(&image);

        if let Err(e) = self.write_new(&path, &upload.bytes).await {
            if e.kind() != io::ErrorKind::AlreadyExists {
                let _ = tokio::fs::remove_file(&path).await;
            }
            return Err(ContentError::storage("write image")(e));
        }

        tracing::debug!(image = %image, bytes = upload.bytes.len(), "Image stored");
        Ok(image)
    }

    async fn read(&self, image: &ImageRef) -> ContentResult<Vec<u8>> {
        tokio::fs::read(self.path_of(image))
            .await
            .map_err(ContentError::storage("read image"))
    }

    async fn remove(&self, image: &ImageRef) -> ContentResult<()> {
        match tokio::fs::remove_file(self.path_of(image)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(image = %image, "Image already gone");
                Ok(())
            }
            Err(e) => Err(ContentError::storage("remove image")(e)),
        }
    }
}
