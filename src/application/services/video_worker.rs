use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{Semaphore, mpsc};
use tracing::Instrument;

use crate::application::ports::{JobRepository, RepositoryError, UploadStore};
use crate::domain::{JobId, VideoAnalysis, progress_percent};

use super::{EngineSlot, VideoJobMessage};

/// Drains the video queue. Each job runs in its own task; at most
/// `max_concurrent_jobs` run at the same time.
pub struct VideoWorker {
    receiver: mpsc::Receiver<VideoJobMessage>,
    engine: Arc<EngineSlot>,
    job_repository: Arc<dyn JobRepository>,
    upload_store: Arc<dyn UploadStore>,
    permits: Arc<Semaphore>,
}

impl VideoWorker {
    pub fn new(
        receiver: mpsc::Receiver<VideoJobMessage>,
        engine: Arc<EngineSlot>,
        job_repository: Arc<dyn JobRepository>,
        upload_store: Arc<dyn UploadStore>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            receiver,
            engine,
            job_repository,
            upload_store,
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Video worker started");
        while let Some(msg) = self.receiver.recv().await {
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                break;
            };

            let span = tracing::info_span!("video_job", job_id = %msg.job_id);
            let task = JobTask {
                engine: Arc::clone(&self.engine),
                job_repository: Arc::clone(&self.job_repository),
                upload_store: Arc::clone(&self.upload_store),
            };

            tokio::spawn(
                async move {
                    let job_id = msg.job_id;
                    if let Err(e) = task.process(msg).await {
                        tracing::error!(error = %e, job_id = %job_id, "Failed to record job outcome");
                    }
                    drop(permit);
                }
                .instrument(span),
            );
        }
        tracing::info!("Video worker stopped: channel closed");
    }
}

struct JobTask {
    engine: Arc<EngineSlot>,
    job_repository: Arc<dyn JobRepository>,
    upload_store: Arc<dyn UploadStore>,
}

impl JobTask {
    /// Records the job outcome, then removes the staged input when the
    /// message asks for it. Cleanup runs whichever way the job ended.
    async fn process(&self, msg: VideoJobMessage) -> Result<(), RepositoryError> {
        let result = self.record_outcome(&msg).await;

        if msg.delete_after_processing {
            if let Err(e) = self.upload_store.delete(&msg.input_path).await {
                tracing::warn!(
                    error = %e,
                    path = %msg.input_path.display(),
                    "Failed to delete staged video after processing"
                );
            }
        }

        result
    }

    async fn record_outcome(&self, msg: &VideoJobMessage) -> Result<(), RepositoryError> {
        let job_id = msg.job_id;

        let Some(engine) = self.engine.get() else {
            return self
                .job_repository
                .mark_failed(job_id, "Engine not initialized")
                .await;
        };

        tracing::debug!(input = %msg.input_path.display(), "Video job started");

        let handle = Handle::current();
        let repository = Arc::clone(&self.job_repository);
        let input_path = msg.input_path.clone();
        let prompt = msg.prompt.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let mut on_progress = |fraction: f32| {
                record_progress(&handle, repository.as_ref(), job_id, fraction);
            };
            engine.analyze_video(&input_path, &prompt, &mut on_progress)
        })
        .await;

        match outcome {
            Ok(VideoAnalysis::Success {
                output_path,
                frames_written,
            }) => {
                tracing::info!(frames = frames_written, "Video job completed");
                self.job_repository
                    .mark_completed(job_id, output_path)
                    .await
            }
            Ok(VideoAnalysis::Error { message }) => {
                tracing::warn!(error = %message, "Video job failed");
                self.job_repository.mark_failed(job_id, &message).await
            }
            Err(e) => {
                tracing::error!(error = %e, "Video job task aborted");
                self.job_repository
                    .mark_failed(job_id, &format!("processing task aborted: {e}"))
                    .await
            }
        }
    }
}

// Runs on the blocking pool, so waiting on the runtime handle is allowed here.
fn record_progress(handle: &Handle, repository: &dyn JobRepository, job_id: JobId, fraction: f32) {
    let percent = progress_percent(fraction);
    if let Err(e) = handle.block_on(repository.update_progress(job_id, percent)) {
        tracing::warn!(error = %e, job_id = %job_id, "Failed to record progress");
    }
}
