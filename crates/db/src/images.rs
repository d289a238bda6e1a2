//! Garment photo storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use closet_core::domain::garment::{ImageRef, UserId};
use closet_core::ApplicationError;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("invalid image key `{0}`")]
    InvalidKey(String),
    #[error("image storage io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageStoreError> for ApplicationError {
    fn from(value: ImageStoreError) -> Self {
        Self::Persistence(value.to_string())
    }
}

/// Object key for a user's photo, `images/{uid}/{name}`.
///
/// Only the final path component of `image_name` is kept.
pub fn image_key(uid: &UserId, image_name: &str) -> String {
    let name = Path::new(image_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(image_name);
    format!("images/{}/{}", uid.0, name)
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Writes `bytes` under `key` and returns the public reference.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<ImageRef, ImageStoreError>;

    /// Removes `key`; `false` when nothing was stored there.
    async fn delete(&self, key: &str) -> Result<bool, ImageStoreError>;

    fn public_url(&self, key: &str) -> ImageRef;
}

/// Stores images as plain files below a root directory.
#[derive(Clone, Debug)]
pub struct FsImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ImageStoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative.components().all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(ImageStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<ImageRef, ImageStoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(event_name = "images.put", key, size = bytes.len(), "stored garment image");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, ImageStoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    fn public_url(&self, key: &str) -> ImageRef {
        let base = self.public_base_url.trim_end_matches('/');
        ImageRef(format!("{base}/{key}"))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn key_keeps_only_the_file_name() {
        let uid = UserId("홍길동".to_string());
        assert_eq!(image_key(&uid, "shirt.jpg"), "images/홍길동/shirt.jpg");
        assert_eq!(image_key(&uid, "../../etc/passwd"), "images/홍길동/passwd");
    }

    #[tokio::test]
    async fn put_then_delete_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let store = FsImageStore::new(dir.path(), "https://cdn.example.com/");

        let image_ref = store.put("images/u1/shirt.jpg", b"jpeg").await.expect("put");
        assert_eq!(image_ref, ImageRef("https://cdn.example.com/images/u1/shirt.jpg".to_string()));
        assert!(dir.path().join("images/u1/shirt.jpg").exists());

        assert!(store.delete("images/u1/shirt.jpg").await.expect("delete"));
        assert!(!store.delete("images/u1/shirt.jpg").await.expect("second delete"));
    }

    #[tokio::test]
    async fn escaping_keys_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let store = FsImageStore::new(dir.path(), "/");

        let error = store.put("images/../../outside.jpg", b"x").await;
        assert!(matches!(error, Err(ImageStoreError::InvalidKey(_))));
        assert!(matches!(store.delete("/etc/hosts").await, Err(ImageStoreError::InvalidKey(_))));
    }
}
