use std::io;
use std::path::{Path, PathBuf};

use crate::domain::UploadName;

/// Stages uploaded files on local disk so the media pipeline can open them
/// by path.
#[async_trait::async_trait]
pub trait UploadStore: Send + Sync {
    async fn store(&self, name: &UploadName, data: &[u8]) -> Result<PathBuf, UploadStoreError>;

    async fn delete(&self, path: &Path) -> Result<(), UploadStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
