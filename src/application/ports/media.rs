use std::io;
use std::path::Path;

use image::RgbImage;

use crate::domain::VideoProperties;

/// Sequential frame reader over an opened video container.
pub trait FrameSource: Send {
    fn properties(&self) -> VideoProperties;

    /// Returns `Ok(None)` once the stream is exhausted.
    fn read_frame(&mut self) -> Result<Option<RgbImage>, MediaError>;
}

/// Encoder for an output video. Every frame must match the dimensions the
/// sink was created with.
pub trait FrameSink: Send {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), MediaError>;

    /// Flushes the encoder and returns the number of frames written.
    fn finish(self: Box<Self>) -> Result<u64, MediaError>;
}

pub trait MediaBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError>;

    fn create(
        &self,
        path: &Path,
        properties: &VideoProperties,
    ) -> Result<Box<dyn FrameSink>, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to open video: {0}")]
    OpenFailed(String),
    #[error("frame decode failed: {0}")]
    DecodeFailed(String),
    #[error("frame encode failed: {0}")]
    EncodeFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
