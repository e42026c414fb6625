//! Directory-backed [`ObjectStore`] for development and tests.
//!
//! The root directory plays the bucket: key `processed/job1.docx` is the
//! file `{root}/processed/job1.docx`. Missing keys fail with the same
//! wording S3 uses.

use super::{ObjectStore, StorageError};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A directory acting as a bucket.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path under the root, refusing keys that escape it.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(StorageError(format!("InvalidObjectName: '{}'", key)));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    async fn download(&self, key: &str, dest: &Path) -> Result<(), StorageError> {
        let src = self.path_for(key)?;
        if !tokio::fs::try_exists(&src).await.unwrap_or(false) {
            return Err(StorageError(
                "NoSuchKey: The specified key does not exist.".to_string(),
            ));
        }
        tokio::fs::copy(&src, dest)
            .await
            .map_err(|e| StorageError(format!("failed to copy {}: {}", src.display(), e)))?;
        debug!("local GET {} → {}", key, dest.display());
        Ok(())
    }

    async fn upload(&self, src: &Path, key: &str, _content_type: &str) -> Result<(), StorageError> {
        let dest = self.path_for(key)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError(format!("failed to create {}: {}", parent.display(), e)))?;
        }
        tokio::fs::copy(src, &dest)
            .await
            .map_err(|e| StorageError(format!("failed to copy to {}: {}", dest.display(), e)))?;
        debug!("local PUT {} → {}", src.display(), key);
        Ok(())
    }
}
