use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::Instrument;

use crate::application::ports::UploadStore;
use crate::application::services::JobService;
use crate::domain::{JobId, UploadName};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::upload_form::UploadForm;

#[derive(Serialize)]
pub struct AnalyzeVideoResponse {
    pub job_id: String,
    pub status: String,
}

/// Stages the uploaded video under a job-scoped name and queues it. Returns
/// as soon as the job record exists. Staging and submission run in their
/// own task so a dropped request never leaves a staged file without a job.
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_video_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalyzeVideoResponse>), ApiError> {
    if state.engine.get().is_none() {
        return Err(ApiError::EngineUninitialized);
    }

    let form = UploadForm::from_multipart(multipart).await?;
    let prompt = form
        .prompt
        .ok_or_else(|| ApiError::BadRequest("Missing prompt".to_string()))?;

    let job_id = JobId::new();
    tracing::info!(
        job_id = %job_id,
        filename = %form.filename,
        bytes = form.data.len(),
        prompt = %sanitize_prompt(&prompt),
        "Video analysis requested"
    );

    let name = UploadName::for_video(&job_id, &form.filename);
    tokio::spawn(
        stage_and_submit(
            Arc::clone(&state.job_service),
            Arc::clone(&state.upload_store),
            job_id,
            name,
            form.data,
            prompt,
        )
        .in_current_span(),
    )
    .await
    .map_err(|e| ApiError::Internal(format!("Video submission task failed: {e}")))??;

    Ok((
        StatusCode::ACCEPTED,
        Json(AnalyzeVideoResponse {
            job_id: job_id.to_string(),
            status: "started".to_string(),
        }),
    ))
}

async fn stage_and_submit(
    job_service: Arc<JobService>,
    upload_store: Arc<dyn UploadStore>,
    job_id: JobId,
    name: UploadName,
    data: Bytes,
    prompt: String,
) -> Result<(), ApiError> {
    let path = upload_store
        .store(&name, &data)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to stage upload: {e}")))?;

    if let Err(e) = job_service.submit(job_id, path.clone(), prompt).await {
        if let Err(del_err) = upload_store.delete(&path).await {
            tracing::warn!(
                error = %del_err,
                path = %path.display(),
                "Failed to delete staged video after rejected submission"
            );
        }
        return Err(e.into());
    }

    tracing::info!(job_id = %job_id, "Video analysis job started");
    Ok(())
}
