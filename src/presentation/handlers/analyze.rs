use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use tracing::Instrument;

use crate::application::ports::UploadStore;
use crate::application::services::ProcessingEngine;
use crate::domain::{ImageAnalysis, UploadName};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::upload_form::UploadForm;

pub const DEFAULT_PROMPT: &str = "target";

/// Runs the image pipeline on the uploaded file and returns its result
/// inline. Staging, analysis and removal of the staged file run in their
/// own task, so a client that disconnects mid-request still gets its upload
/// cleaned up.
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImageAnalysis>, ApiError> {
    let engine = state.engine.get().ok_or(ApiError::EngineUninitialized)?;
    let form = UploadForm::from_multipart(multipart).await?;
    let prompt = form.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    tracing::info!(
        filename = %form.filename,
        bytes = form.data.len(),
        prompt = %sanitize_prompt(&prompt),
        "Image analysis requested"
    );

    let name = UploadName::for_image(&form.filename);
    let upload_store = Arc::clone(&state.upload_store);
    let analysis = tokio::spawn(
        stage_and_analyze(engine, upload_store, name, form.data, prompt).in_current_span(),
    )
    .await
    .map_err(|e| ApiError::Internal(format!("Image analysis task failed: {e}")))??;

    Ok(Json(analysis))
}

async fn stage_and_analyze(
    engine: Arc<ProcessingEngine>,
    upload_store: Arc<dyn UploadStore>,
    name: UploadName,
    data: Bytes,
    prompt: String,
) -> Result<ImageAnalysis, ApiError> {
    let path = upload_store
        .store(&name, &data)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to stage upload: {e}")))?;

    let task_path = path.clone();
    let outcome =
        tokio::task::spawn_blocking(move || engine.analyze_image(&task_path, &prompt)).await;

    if let Err(e) = upload_store.delete(&path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to delete staged image");
    }

    outcome.map_err(|e| ApiError::Internal(format!("Image analysis task failed: {e}")))
}
