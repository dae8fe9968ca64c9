use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{Job, JobId};

use super::RepositoryError;

/// Storage for video job records.
///
/// Implementations must tolerate concurrent calls from many job tasks.
/// Updates on a terminal job, or progress that would move backwards, are
/// silently ignored.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn update_progress(&self, id: JobId, percent: u8) -> Result<(), RepositoryError>;

    async fn mark_completed(&self, id: JobId, result_path: PathBuf)
    -> Result<(), RepositoryError>;

    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError>;
}
