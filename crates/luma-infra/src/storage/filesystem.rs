//! Local filesystem photo store.
//!
//! Objects are stored at `{base_dir}/{key}`, where keys look like
//! `photos/{uuid}.{ext}`. Writes go to a temporary sibling first and are
//! renamed into place, so a reader never sees a half-written photo.

use std::io;
use std::path::{Component, Path, PathBuf};

use luma_core::storage::photo_store::PhotoStore;

/// Filesystem-backed [`PhotoStore`].
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    base_dir: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a key to a path inside `base_dir`. Only plain relative
    /// components are accepted.
    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            ));
        }
        Ok(self.base_dir.join(relative))
    }
}

impl PhotoStore for LocalPhotoStore {
    async fn put(&self, key: &str, data: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }

        tracing::debug!(key, bytes = data.len(), "wrote photo to disk");
        Ok(())
    }

    async fn get(&self, key: &str) -> io::Result<Vec<u8>> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path).await
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
