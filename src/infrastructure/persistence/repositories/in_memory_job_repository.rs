use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId};

/// Process-lifetime job table. Records are never evicted.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn with_job<F>(&self, id: JobId, mutate: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Job) -> bool + Send,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or(RepositoryError::JobNotFound(id))?;

        if !mutate(job) {
            tracing::trace!(status = %job.status, progress = job.progress, "Job update ignored");
        }
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::DuplicateJob(job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_progress(&self, id: JobId, percent: u8) -> Result<(), RepositoryError> {
        self.with_job(id, |job| job.record_progress(percent)).await
    }

    #[instrument(skip(self, result_path), fields(job_id = %id))]
    async fn mark_completed(
        &self,
        id: JobId,
        result_path: PathBuf,
    ) -> Result<(), RepositoryError> {
        self.with_job(id, |job| job.complete(result_path)).await
    }

    #[instrument(skip(self, error_message), fields(job_id = %id))]
    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError> {
        self.with_job(id, |job| job.fail(error_message)).await
    }
}
