use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::utils::error::{CustomError, FieldError};
use crate::utils::helpers::stored_file_name;

/// URL prefix under which stored images are served and referenced.
pub const PUBLIC_PREFIX: &str = "images";

const ACCEPTED_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

/// Normalises any reference to a stored image into its `images/<name>` form.
pub fn public_path(path: &str) -> Option<String> {
    let name = Path::new(path).file_name()?.to_str()?;
    Some(format!("{PUBLIC_PREFIX}/{name}"))
}

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: String, data: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            file_name,
            data,
            content_type,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_accepted_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ACCEPTED_TYPES.contains(&ct.to_ascii_lowercase().as_str()))
    }
}

/// Writes post images to a local directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Maps a public path such as `images/x.png` (or a bare file name) to a
    /// file inside the image directory. Only the last component is kept.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = Path::new(public_path).file_name()?;
        Some(self.root.join(name))
    }

    pub async fn store(&self, upload: FileUpload) -> Result<Option<String>, CustomError> {
        if !upload.is_accepted_image() {
            log::debug!(
                "Declining upload {:?} with content type {:?}",
                upload.file_name,
                upload.content_type
            );
            return Ok(None);
        }

        if upload.size() > self.max_bytes {
            return Err(CustomError::invalid_input(vec![FieldError::new(format!(
                "File too large, maximum size is {} bytes",
                self.max_bytes
            ))]));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CustomError::store("Failed to prepare image directory", e))?;

        let name = stored_file_name(Utc::now(), &upload.file_name);
        tokio::fs::write(self.root.join(&name), &upload.data)
            .await
            .map_err(|e| CustomError::store("Failed to store image", e))?;

        log::info!("Stored image {name} ({} bytes)", upload.size());
        Ok(Some(format!("{PUBLIC_PREFIX}/{name}")))
    }

    /// Stores `upload`, then drops `old_path` if the new file was kept.
    pub async fn replace(
        &self,
        old_path: Option<&str>,
        upload: FileUpload,
    ) -> Result<Option<String>, CustomError> {
        let stored = self.store(upload).await?;

        if let (Some(new), Some(old)) = (&stored, old_path) {
            if new != old {
                self.delete(old).await;
            }
        }

        Ok(stored)
    }

    pub async fn delete(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            log::warn!("Refusing to delete image with unusable path {public_path:?}");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => log::info!("Deleted image {}", path.display()),
            Err(e) => log::warn!("Could not delete image {}: {e}", path.display()),
        }
    }
}
