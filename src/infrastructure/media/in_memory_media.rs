use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};

use crate::application::ports::{FrameSink, FrameSource, MediaBackend, MediaError};
use crate::domain::VideoProperties;

/// Shape of the clip served for every opened path.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticClip {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frames: u64,
    /// Frame count reported through `properties()`. Defaults to `frames`;
    /// set it to 0 to model containers without a count.
    pub reported_frame_count: Option<u64>,
    pub fill: Rgb<u8>,
    /// Fail with a decode error when this frame index is requested.
    pub fail_at_frame: Option<u64>,
}

impl SyntheticClip {
    pub fn new(width: u32, height: u32, frames: u64) -> Self {
        Self {
            width,
            height,
            fps: 25.0,
            frames,
            reported_frame_count: None,
            fill: Rgb([0, 0, 0]),
            fail_at_frame: None,
        }
    }

    fn properties(&self) -> VideoProperties {
        VideoProperties {
            width: self.width,
            height: self.height,
            fps: self.fps,
            frame_count: self.reported_frame_count.unwrap_or(self.frames),
        }
    }
}

/// Media backend that needs no codecs. Any non-empty file opens as the
/// configured synthetic clip. Encoded frames are kept in memory, and the
/// output file receives their raw `rgb24` bytes.
#[derive(Clone)]
pub struct InMemoryMediaBackend {
    clip: SyntheticClip,
    written: Arc<Mutex<HashMap<PathBuf, Vec<RgbImage>>>>,
}

impl InMemoryMediaBackend {
    pub fn new(clip: SyntheticClip) -> Self {
        Self {
            clip,
            written: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Frames committed to `path` by a finished sink.
    pub fn written_frames(&self, path: &Path) -> Option<Vec<RgbImage>> {
        self.written
            .lock()
            .ok()
            .and_then(|written| written.get(path).cloned())
    }
}

impl MediaBackend for InMemoryMediaBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| MediaError::OpenFailed(format!("{}: {e}", path.display())))?;
        if metadata.len() == 0 {
            return Err(MediaError::OpenFailed(format!(
                "{} is empty",
                path.display()
            )));
        }

        Ok(Box::new(SyntheticSource {
            clip: self.clip,
            next_index: 0,
        }))
    }

    fn create(
        &self,
        path: &Path,
        properties: &VideoProperties,
    ) -> Result<Box<dyn FrameSink>, MediaError> {
        Ok(Box::new(RecordingSink {
            path: path.to_path_buf(),
            width: properties.width,
            height: properties.height,
            frames: Vec::new(),
            written: Arc::clone(&self.written),
        }))
    }
}

struct SyntheticSource {
    clip: SyntheticClip,
    next_index: u64,
}

impl FrameSource for SyntheticSource {
    fn properties(&self) -> VideoProperties {
        self.clip.properties()
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, MediaError> {
        if self.clip.fail_at_frame == Some(self.next_index) {
            return Err(MediaError::DecodeFailed(format!(
                "corrupt frame {}",
                self.next_index
            )));
        }
        if self.next_index >= self.clip.frames {
            return Ok(None);
        }
        self.next_index += 1;
        Ok(Some(RgbImage::from_pixel(
            self.clip.width,
            self.clip.height,
            self.clip.fill,
        )))
    }
}

struct RecordingSink {
    path: PathBuf,
    width: u32,
    height: u32,
    frames: Vec<RgbImage>,
    written: Arc<Mutex<HashMap<PathBuf, Vec<RgbImage>>>>,
}

impl FrameSink for RecordingSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), MediaError> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(MediaError::EncodeFailed(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<u64, MediaError> {
        let raw: Vec<u8> = self
            .frames
            .iter()
            .flat_map(|f| f.as_raw().iter().copied())
            .collect();
        std::fs::write(&self.path, raw)?;

        let count = self.frames.len() as u64;
        let mut written = self
            .written
            .lock()
            .map_err(|_| MediaError::EncodeFailed("frame store poisoned".to_string()))?;
        written.insert(self.path, self.frames);
        Ok(count)
    }
}
