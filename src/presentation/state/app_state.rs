use std::sync::Arc;

use crate::application::ports::UploadStore;
use crate::application::services::{EngineSlot, JobService};
use crate::presentation::config::Settings;

/// Everything a handler needs, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineSlot>,
    pub job_service: Arc<JobService>,
    pub upload_store: Arc<dyn UploadStore>,
    pub settings: Settings,
}
