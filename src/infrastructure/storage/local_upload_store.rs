use std::io;
use std::path::{Path, PathBuf};

use crate::application::ports::{UploadStore, UploadStoreError};
use crate::domain::UploadName;

/// Writes uploads into a single staging directory on the local filesystem.
pub struct LocalUploadStore {
    base_path: PathBuf,
}

impl LocalUploadStore {
    pub fn new(base_path: PathBuf) -> Result<Self, UploadStoreError> {
        std::fs::create_dir_all(&base_path).map_err(UploadStoreError::Io)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, name: &UploadName) -> PathBuf {
        self.base_path.join(name.as_str())
    }
}

#[async_trait::async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, name: &UploadName, data: &[u8]) -> Result<PathBuf, UploadStoreError> {
        let path = self.path_for(name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| UploadStoreError::WriteFailed(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Upload staged");
        Ok(path)
    }

    async fn delete(&self, path: &Path) -> Result<(), UploadStoreError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadStoreError::DeleteFailed(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }
}
