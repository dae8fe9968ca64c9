use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::{JobId, JobStatus};

pub const MAX_PROGRESS: u8 = 100;

/// A video segmentation job.
///
/// Progress only moves forward and `result_path` is set exactly when the job
/// is `Completed`. Once a job reaches a terminal status every further
/// mutation is ignored.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub prompt: String,
    pub input_path: PathBuf,
    pub result_path: Option<PathBuf>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, input_path: PathBuf, prompt: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Processing,
            progress: 0,
            prompt,
            input_path,
            result_path: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Raises progress to `percent`. Returns `false` when the update was
    /// dropped because the job is terminal or the value would go backwards.
    pub fn record_progress(&mut self, percent: u8) -> bool {
        let percent = percent.min(MAX_PROGRESS);
        if self.status.is_terminal() || percent <= self.progress {
            return false;
        }
        self.progress = percent;
        self.updated_at = Utc::now();
        true
    }

    pub fn complete(&mut self, result_path: PathBuf) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Completed;
        self.progress = MAX_PROGRESS;
        self.result_path = Some(result_path);
        self.updated_at = Utc::now();
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Converts a pipeline fraction in `[0, 1]` to a whole percent, rounding down.
pub fn progress_percent(fraction: f32) -> u8 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    (fraction.min(1.0) * 100.0).floor() as u8
}
