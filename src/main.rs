use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use eidos::application::ports::{JobRepository, MediaBackend, RegionProposer, UploadStore};
use eidos::application::services::{EngineSlot, JobService, ProcessingEngine, VideoWorker};
use eidos::infrastructure::media::FfmpegMediaBackend;
use eidos::infrastructure::observability::{TracingConfig, init_tracing};
use eidos::infrastructure::persistence::InMemoryJobRepository;
use eidos::infrastructure::storage::LocalUploadStore;
use eidos::infrastructure::vision::{CheckpointModelLoader, SimulatedRegionProposer};
use eidos::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let tracing_config = TracingConfig::new(
        environment.as_str(),
        settings.logging.json || environment == Environment::Prod,
        settings.logging.level.clone(),
    );
    init_tracing(&tracing_config, settings.server.port);

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let upload_store: Arc<dyn UploadStore> = Arc::new(
        LocalUploadStore::new(settings.uploads.dir.clone())
            .context("Failed to prepare upload directory")?,
    );

    let engine = Arc::new(EngineSlot::new());
    let (sender, receiver) = mpsc::channel(settings.jobs.queue_capacity.max(1));

    let job_service = Arc::new(JobService::new(
        Arc::clone(&job_repository),
        sender,
        settings.jobs.delete_input_after_processing,
    ));

    let worker = VideoWorker::new(
        receiver,
        Arc::clone(&engine),
        Arc::clone(&job_repository),
        Arc::clone(&upload_store),
        settings.jobs.max_concurrent_jobs,
    );
    tokio::spawn(worker.run());

    spawn_engine_startup(Arc::clone(&engine), &settings);

    let state = AppState {
        engine,
        job_service,
        upload_store,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let ip = settings
        .server
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid server host: {}", settings.server.host))?;
    let addr = SocketAddr::from((ip, settings.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Loads the engine in the background so the server can answer `/` and
/// `/health` while weights are located. Requests that need the engine get
/// 503 until it is installed.
fn spawn_engine_startup(slot: Arc<EngineSlot>, settings: &Settings) {
    let loader = CheckpointModelLoader::new(settings.engine.weights_path.clone());
    let preference = settings.engine.device;
    let output_dir = settings.engine.output_dir.clone();
    let proposer: Arc<dyn RegionProposer> = Arc::new(SimulatedRegionProposer::new());
    let media: Arc<dyn MediaBackend> = Arc::new(FfmpegMediaBackend::new(
        settings.media.ffmpeg_path.clone(),
        settings.media.ffprobe_path.clone(),
        settings.media.video_codec.clone(),
    ));

    slot.mark_loading();
    tokio::spawn(async move {
        tracing::info!("Igniting E.I.D.O.S. engine");
        let engine =
            ProcessingEngine::initialize(&loader, preference, proposer, media, output_dir).await;
        slot.install(engine);
        tracing::info!(state = slot.state().as_str(), "Engine online");
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
