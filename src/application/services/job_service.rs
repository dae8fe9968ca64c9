use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus};

/// Work item handed from the API to the video worker.
#[derive(Debug, Clone)]
pub struct VideoJobMessage {
    pub job_id: JobId,
    pub input_path: PathBuf,
    pub prompt: String,
    pub delete_after_processing: bool,
}

/// Creates video jobs and answers status and result lookups. The worker is
/// the only writer of a job once it has been submitted.
pub struct JobService {
    job_repository: Arc<dyn JobRepository>,
    sender: mpsc::Sender<VideoJobMessage>,
    delete_after_processing: bool,
}

impl JobService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        sender: mpsc::Sender<VideoJobMessage>,
        delete_after_processing: bool,
    ) -> Self {
        Self {
            job_repository,
            sender,
            delete_after_processing,
        }
    }

    /// Records a processing job at 0% and queues it. The queue slot is
    /// reserved first so a full queue leaves no orphaned record behind.
    pub async fn submit(
        &self,
        job_id: JobId,
        input_path: PathBuf,
        prompt: String,
    ) -> Result<JobId, JobServiceError> {
        let permit = self.sender.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => JobServiceError::QueueFull,
            TrySendError::Closed(()) => JobServiceError::WorkerUnavailable,
        })?;

        let job = Job::new(job_id, input_path.clone(), prompt.clone());
        self.job_repository.create(&job).await?;

        permit.send(VideoJobMessage {
            job_id,
            input_path,
            prompt,
            delete_after_processing: self.delete_after_processing,
        });

        tracing::info!(job_id = %job_id, "Video job queued");
        Ok(job_id)
    }

    pub async fn get_status(&self, job_id: JobId) -> Result<Job, JobServiceError> {
        self.job_repository
            .get_by_id(job_id)
            .await?
            .ok_or(JobServiceError::NotFound(job_id))
    }

    /// Output path of a completed job.
    pub async fn get_result(&self, job_id: JobId) -> Result<PathBuf, JobServiceError> {
        let job = self.get_status(job_id).await?;
        match (job.status, job.result_path) {
            (JobStatus::Completed, Some(path)) => Ok(path),
            (status, _) => Err(JobServiceError::NotReady { job_id, status }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("Job not found: {0}")]
    NotFound(JobId),
    #[error("Result not ready: job {job_id} is {status}")]
    NotReady { job_id: JobId, status: JobStatus },
    #[error("Video queue is full")]
    QueueFull,
    #[error("Video worker unavailable")]
    WorkerUnavailable,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
