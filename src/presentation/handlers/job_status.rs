use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::domain::{Job, JobId};
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id.to_string(),
            status: job.status.as_str().to_string(),
            progress: job.progress,
            result: job.result_path.map(|p| p.display().to_string()),
            error: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let id = JobId::parse(&job_id)
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {job_id}")))?;

    let job = state.job_service.get_status(id).await?;
    Ok(Json(job.into()))
}
