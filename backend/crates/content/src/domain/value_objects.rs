//! Domain Value Objects

use std::fmt;
use std::io;

use kernel::id::Id;
use platform::upload::is_plain_file_name;
use serde::Serialize;

use crate::error::{ContentError, ContentResult};

/// Database id of a content record
pub type EntityId<E> = Id<E>;

/// File name of a stored image, relative to the upload directory
///
/// Never contains a path separator or `..`, so it cannot address anything
/// outside the upload root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn parse(reference: impl Into<String>) -> ContentResult<Self> {
        let reference = reference.into();
        if !is_plain_file_name(&reference) {
            return Err(ContentError::StorageIo {
                op: "resolve image",
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("image reference `{reference}` is not a plain file name"),
                ),
            });
        }
        Ok(Self(reference))
    }

    /// Trust a value read back from the database
    pub fn from_db(reference: String) -> Self {
        Self(reference)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_accepted() {
        let image = ImageRef::parse("0123456789ab_logo.png").unwrap();
        assert_eq!(image.as_str(), "0123456789ab_logo.png");
        assert_eq!(serde_json::to_string(&image).unwrap(), "\"0123456789ab_logo.png\"");
    }

    #[test]
    fn test_traversal_rejected() {
        for bad in ["", "..", "../etc/passwd", "a/b.png", "a\\b.png"] {
            let err = ImageRef::parse(bad).unwrap_err();
            assert!(matches!(err, ContentError::StorageIo { .. }), "{bad}");
        }
    }
}
