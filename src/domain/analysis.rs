use std::path::PathBuf;

use serde::Serialize;

use super::BoundingBox;

/// Outcome of a synchronous image analysis. Serializes to the wire shape
/// `{"status": "success" | "error", ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImageAnalysis {
    Success {
        message: String,
        image: String,
        confidence: f64,
        region: BoundingBox,
    },
    Error {
        message: String,
    },
}

impl ImageAnalysis {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoAnalysis {
    Success {
        output_path: PathBuf,
        frames_written: u64,
    },
    Error {
        message: String,
    },
}

impl VideoAnalysis {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
