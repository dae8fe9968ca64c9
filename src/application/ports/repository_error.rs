use crate::domain::JobId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("job {0} already exists")]
    DuplicateJob(JobId),
}
