use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::domain::JobId;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Serves the processed video of a completed job.
#[tracing::instrument(skip(state))]
pub async fn job_result_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = JobId::parse(&job_id)
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {job_id}")))?;

    let path = state.job_service.get_result(id).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read result {}: {e}", path.display())))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{id}.mp4"));

    Ok((
        [
            (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
