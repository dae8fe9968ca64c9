mod job_repository;
mod media;
mod model_loader;
mod region_proposer;
mod repository_error;
mod upload_store;

pub use job_repository::JobRepository;
pub use media::{FrameSink, FrameSource, MediaBackend, MediaError};
pub use model_loader::{Device, DevicePreference, ModelHandle, ModelLoadError, ModelLoader};
pub use region_proposer::RegionProposer;
pub use repository_error::RepositoryError;
pub use upload_store::{UploadStore, UploadStoreError};
