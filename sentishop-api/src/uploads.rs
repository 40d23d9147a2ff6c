//! Uploaded image storage
//!
//! Files are written under a generated `<uuid>.jpg` name inside the upload
//! directory and served back from `/uploads/<filename>`.

use sentishop_common::{uuid_utils, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension given to every stored upload
pub const IMAGE_EXTENSION: &str = "jpg";

/// URL prefix the upload directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

/// A file written by [`UploadStorage::save`]
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub path: PathBuf,
}

impl StoredImage {
    pub fn url(&self) -> String {
        format!("{}/{}", UPLOADS_ROUTE, self.filename)
    }
}

#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Write `bytes` under a fresh unique filename
    pub async fn save(&self, bytes: &[u8]) -> Result<StoredImage> {
        let filename = format!("{}.{}", uuid_utils::generate_string(), IMAGE_EXTENSION);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Stored upload");
        Ok(StoredImage { filename, path })
    }

    pub async fn read(&self, image: &StoredImage) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&image.path).await?)
    }

    pub async fn remove(&self, image: &StoredImage) -> Result<()> {
        tokio::fs::remove_file(&image.path).await?;
        Ok(())
    }
}
