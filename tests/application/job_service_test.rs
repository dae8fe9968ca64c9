use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use eidos::application::ports::{JobRepository, UploadStore};
use eidos::application::services::{
    EngineSlot, JobService, JobServiceError, VideoJobMessage, VideoWorker,
};
use eidos::domain::{Job, JobId, JobStatus};
use eidos::infrastructure::media::{InMemoryMediaBackend, SyntheticClip};
use eidos::infrastructure::persistence::InMemoryJobRepository;
use eidos::infrastructure::storage::LocalUploadStore;

use crate::helpers::degraded_engine;

struct Fixture {
    repository: Arc<InMemoryJobRepository>,
    upload_store: Arc<dyn UploadStore>,
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let upload_store: Arc<dyn UploadStore> =
            Arc::new(LocalUploadStore::new(dir.path().join("uploads")).unwrap());
        Self {
            repository: Arc::new(InMemoryJobRepository::new()),
            upload_store,
            dir,
        }
    }

    fn repository(&self) -> Arc<dyn JobRepository> {
        self.repository.clone()
    }

    fn staged_input(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join("uploads").join(name);
        std::fs::write(&path, b"video bytes").unwrap();
        path
    }

    fn spawn_worker(&self, engine: EngineSlot, receiver: mpsc::Receiver<VideoJobMessage>) {
        let worker = VideoWorker::new(
            receiver,
            Arc::new(engine),
            self.repository(),
            Arc::clone(&self.upload_store),
            2,
        );
        tokio::spawn(worker.run());
    }

    async fn wait_for_terminal(&self, job_id: JobId) -> Job {
        for _ in 0..500 {
            let job = self.repository.get_by_id(job_id).await.unwrap().unwrap();
            if job.is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {job_id} did not finish");
    }
}

/// The staged input is removed after the outcome is recorded, so give the
/// worker a moment to get there.
async fn wait_until_removed(path: &std::path::Path) -> bool {
    for _ in 0..200 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn given_submitted_job_when_status_requested_then_processing_at_zero() {
    let fixture = Fixture::new();
    let (sender, _receiver) = mpsc::channel(4);
    let service = JobService::new(fixture.repository(), sender, false);

    let job_id = service
        .submit(JobId::new(), PathBuf::from("in.mp4"), "car".to_string())
        .await
        .unwrap();

    let job = service.get_status(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress, 0);
    assert_eq!(job.prompt, "car");
}

#[tokio::test]
async fn given_processing_job_when_result_requested_then_not_ready() {
    let fixture = Fixture::new();
    let (sender, _receiver) = mpsc::channel(4);
    let service = JobService::new(fixture.repository(), sender, false);
    let job_id = service
        .submit(JobId::new(), PathBuf::from("in.mp4"), "car".to_string())
        .await
        .unwrap();

    let result = service.get_result(job_id).await;

    assert!(matches!(
        result,
        Err(JobServiceError::NotReady {
            status: JobStatus::Processing,
            ..
        })
    ));
}

#[tokio::test]
async fn given_unknown_id_when_status_requested_then_not_found() {
    let fixture = Fixture::new();
    let (sender, _receiver) = mpsc::channel(4);
    let service = JobService::new(fixture.repository(), sender, false);

    let result = service.get_status(JobId::new()).await;

    assert!(matches!(result, Err(JobServiceError::NotFound(_))));
}

#[tokio::test]
async fn given_full_queue_when_submitting_then_rejected_without_record() {
    let fixture = Fixture::new();
    let (sender, _receiver) = mpsc::channel(1);
    let service = JobService::new(fixture.repository(), sender, false);

    service
        .submit(JobId::new(), PathBuf::from("a.mp4"), "car".to_string())
        .await
        .unwrap();
    let rejected_id = JobId::new();
    let result = service
        .submit(rejected_id, PathBuf::from("b.mp4"), "car".to_string())
        .await;

    assert!(matches!(result, Err(JobServiceError::QueueFull)));
    assert_eq!(fixture.repository.len().await, 1);
    assert!(
        fixture
            .repository
            .get_by_id(rejected_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn given_stopped_worker_when_submitting_then_worker_unavailable() {
    let fixture = Fixture::new();
    let (sender, receiver) = mpsc::channel(4);
    drop(receiver);
    let service = JobService::new(fixture.repository(), sender, false);

    let result = service
        .submit(JobId::new(), PathBuf::from("a.mp4"), "car".to_string())
        .await;

    assert!(matches!(result, Err(JobServiceError::WorkerUnavailable)));
    assert!(fixture.repository.is_empty().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_running_worker_when_job_submitted_then_completes_and_input_deleted() {
    let fixture = Fixture::new();
    let (sender, receiver) = mpsc::channel(4);
    let media = InMemoryMediaBackend::new(SyntheticClip::new(32, 24, 12));
    let engine = EngineSlot::with_engine(degraded_engine(media, fixture.dir.path().join("out")));
    fixture.spawn_worker(engine, receiver);
    let service = JobService::new(fixture.repository(), sender, true);
    let input = fixture.staged_input("temp_job_clip.mp4");

    let job_id = service
        .submit(JobId::new(), input.clone(), "car".to_string())
        .await
        .unwrap();
    let job = fixture.wait_for_terminal(job_id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(
        job.result_path,
        Some(fixture.dir.path().join("out").join("processed_temp_job_clip.mp4"))
    );
    assert_eq!(
        service.get_result(job_id).await.unwrap(),
        job.result_path.unwrap()
    );
    assert!(wait_until_removed(&input).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_undecodable_video_when_processed_then_job_failed_with_message() {
    let fixture = Fixture::new();
    let (sender, receiver) = mpsc::channel(4);
    let mut clip = SyntheticClip::new(32, 24, 12);
    clip.fail_at_frame = Some(0);
    let engine = EngineSlot::with_engine(degraded_engine(
        InMemoryMediaBackend::new(clip),
        fixture.dir.path().join("out"),
    ));
    fixture.spawn_worker(engine, receiver);
    let service = JobService::new(fixture.repository(), sender, false);
    let input = fixture.staged_input("temp_bad.mp4");

    let job_id = service
        .submit(JobId::new(), input.clone(), "car".to_string())
        .await
        .unwrap();
    let job = fixture.wait_for_terminal(job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.unwrap().contains("corrupt frame 0"));
    assert!(job.result_path.is_none());
    assert!(input.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_no_engine_when_job_processed_then_failed_as_uninitialized() {
    let fixture = Fixture::new();
    let (sender, receiver) = mpsc::channel(4);
    fixture.spawn_worker(EngineSlot::new(), receiver);
    let service = JobService::new(fixture.repository(), sender, false);

    let job_id = service
        .submit(JobId::new(), PathBuf::from("in.mp4"), "car".to_string())
        .await
        .unwrap();
    let job = fixture.wait_for_terminal(job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_message.as_deref(), Some("Engine not initialized"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_no_engine_and_cleanup_enabled_when_job_processed_then_input_still_deleted() {
    let fixture = Fixture::new();
    let (sender, receiver) = mpsc::channel(4);
    fixture.spawn_worker(EngineSlot::new(), receiver);
    let service = JobService::new(fixture.repository(), sender, true);
    let input = fixture.staged_input("temp_orphan.mp4");

    let job_id = service
        .submit(JobId::new(), input.clone(), "car".to_string())
        .await
        .unwrap();
    let job = fixture.wait_for_terminal(job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(wait_until_removed(&input).await);
}
