pub mod compositor;
mod engine_slot;
mod job_service;
mod processing_engine;
mod video_worker;

pub use compositor::{Compositor, target_label};
pub use engine_slot::{EngineSlot, EngineState};
pub use job_service::{JobService, JobServiceError, VideoJobMessage};
pub use processing_engine::{
    AnalysisError, CONFIDENCE, EngineCapability, MAX_REPORTED_PROGRESS, ProcessingEngine,
};
pub use video_worker::VideoWorker;
