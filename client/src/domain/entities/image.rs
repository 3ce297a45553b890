//! Image upload payloads (avatars and product photos)

use std::path::Path;

use crate::error::DomainError;

/// Maximum accepted upload size
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, inferring its content type from the extension
    pub async fn from_path(path: &Path) -> Result<Self, DomainError> {
        let content_type = content_type_for(path).ok_or_else(|| {
            DomainError::Validation(format!("Unsupported image type: {}", path.display()))
        })?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.content_type.starts_with("image/") {
            return Err(DomainError::Validation(format!(
                "{} is not an image ({})",
                self.file_name, self.content_type
            )));
        }
        if self.bytes.is_empty() {
            return Err(DomainError::Validation(format!(
                "{} is empty",
                self.file_name
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::Validation(format!(
                "{} exceeds the {} MB upload limit",
                self.file_name,
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}
