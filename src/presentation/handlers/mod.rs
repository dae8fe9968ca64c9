mod analyze;
mod analyze_video;
mod health;
mod job_result;
mod job_status;
mod root;
mod upload_form;

pub use analyze::{DEFAULT_PROMPT, analyze_handler};
pub use analyze_video::{AnalyzeVideoResponse, analyze_video_handler};
pub use health::health_handler;
pub use job_result::{VIDEO_CONTENT_TYPE, job_result_handler};
pub use job_status::{JobStatusResponse, job_status_handler};
pub use root::{SYSTEM_NAME, root_handler};
