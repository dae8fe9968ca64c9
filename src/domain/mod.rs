mod analysis;
mod job;
mod job_id;
mod job_status;
mod mask;
mod upload_name;
mod video_properties;

pub use analysis::{ImageAnalysis, VideoAnalysis};
pub use job::{Job, MAX_PROGRESS, progress_percent};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use mask::{BoundingBox, Mask};
pub use upload_name::{UploadName, sanitize_filename};
pub use video_properties::{FALLBACK_FRAME_COUNT, VideoProperties};
