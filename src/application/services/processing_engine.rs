use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};

use crate::application::ports::{
    DevicePreference, MediaBackend, MediaError, ModelHandle, ModelLoader, RegionProposer,
};
use crate::domain::{ImageAnalysis, VideoAnalysis};

use super::compositor::{Compositor, target_label};

pub const CONFIDENCE: f64 = 0.98;
pub const JPEG_QUALITY: u8 = 95;
/// Ceiling for progress reported from inside the frame loop. The job layer
/// reports 100% itself once the output has been finalised.
pub const MAX_REPORTED_PROGRESS: f32 = 0.99;

/// Whether a real segmentation model backs the engine. Decided once at
/// startup. A degraded engine stays degraded for the life of the process.
#[derive(Debug, Clone)]
pub enum EngineCapability {
    Ready { handle: ModelHandle },
    Degraded { reason: String },
}

impl EngineCapability {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineCapability::Ready { .. })
    }
}

pub struct ProcessingEngine {
    capability: EngineCapability,
    proposer: Arc<dyn RegionProposer>,
    media: Arc<dyn MediaBackend>,
    compositor: Compositor,
    output_dir: PathBuf,
}

impl ProcessingEngine {
    pub fn new(
        capability: EngineCapability,
        proposer: Arc<dyn RegionProposer>,
        media: Arc<dyn MediaBackend>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            capability,
            proposer,
            media,
            compositor: Compositor::default(),
            output_dir,
        }
    }

    /// Attempts to load the segmentation model. A failed load leaves the
    /// engine degraded to simulated detection; it never fails the caller.
    pub async fn initialize(
        loader: &dyn ModelLoader,
        preference: DevicePreference,
        proposer: Arc<dyn RegionProposer>,
        media: Arc<dyn MediaBackend>,
        output_dir: PathBuf,
    ) -> Self {
        let capability = match loader.load(preference).await {
            Ok(handle) => {
                tracing::info!(
                    model = %handle.name,
                    device = %handle.device,
                    size_bytes = handle.size_bytes,
                    "Segmentation model loaded"
                );
                EngineCapability::Ready { handle }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load segmentation model");
                tracing::warn!("Engine running in SIMULATION mode");
                EngineCapability::Degraded {
                    reason: e.to_string(),
                }
            }
        };

        Self::new(capability, proposer, media, output_dir)
    }

    pub fn capability(&self) -> &EngineCapability {
        &self.capability
    }

    pub fn is_ready(&self) -> bool {
        self.capability.is_ready()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    // Both capabilities run simulated detection; inference is not wired in.
    pub fn analyze_image(&self, image_path: &Path, prompt: &str) -> ImageAnalysis {
        tracing::debug!(
            path = %image_path.display(),
            ready = self.is_ready(),
            "Analyzing image"
        );

        match self.run_image(image_path, prompt) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, path = %image_path.display(), "Image analysis failed");
                ImageAnalysis::error(e.to_string())
            }
        }
    }

    /// Processes every frame of the video at `video_path`, reporting the
    /// fraction of frames written through `on_progress` after each one.
    pub fn analyze_video(
        &self,
        video_path: &Path,
        prompt: &str,
        on_progress: &mut dyn FnMut(f32),
    ) -> VideoAnalysis {
        tracing::debug!(
            path = %video_path.display(),
            ready = self.is_ready(),
            "Analyzing video"
        );

        match self.run_video(video_path, prompt, on_progress) {
            Ok((output_path, frames_written)) => {
                tracing::info!(
                    output = %output_path.display(),
                    frames = frames_written,
                    "Video analysis finished"
                );
                VideoAnalysis::Success {
                    output_path,
                    frames_written,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %video_path.display(), "Video analysis failed");
                VideoAnalysis::error(e.to_string())
            }
        }
    }

    pub fn output_path_for(&self, video_path: &Path) -> PathBuf {
        let stem = video_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        self.output_dir.join(format!("processed_{stem}.mp4"))
    }

    fn run_image(&self, image_path: &Path, prompt: &str) -> Result<ImageAnalysis, AnalysisError> {
        let mut image = load_rgb(image_path)?;
        let (width, height) = image.dimensions();

        let mask = self.proposer.propose_image(width, height);
        let region = self
            .compositor
            .composite(&mut image, &mask, &target_label(prompt))
            .ok_or(AnalysisError::EmptyRegion)?;

        let mut jpeg = Vec::new();
        image
            .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))
            .map_err(|e| AnalysisError::Encode(e.to_string()))?;

        Ok(ImageAnalysis::Success {
            message: format!("Target '{prompt}' acquired"),
            image: format!(
                "data:image/jpeg;base64,{}",
                general_purpose::STANDARD.encode(&jpeg)
            ),
            confidence: CONFIDENCE,
            region,
        })
    }

    fn run_video(
        &self,
        video_path: &Path,
        prompt: &str,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<(PathBuf, u64), AnalysisError> {
        let mut source = self.media.open(video_path).map_err(AnalysisError::Open)?;
        let properties = source.properties();
        let total = properties.effective_frame_count();

        std::fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_path_for(video_path);
        let mut sink = self.media.create(&output_path, &properties)?;

        tracing::debug!(
            width = properties.width,
            height = properties.height,
            fps = properties.fps,
            frames = properties.frame_count,
            output = %output_path.display(),
            "Video opened"
        );

        let label = target_label(prompt);
        let mut index: u64 = 0;

        while let Some(mut frame) = source.read_frame()? {
            if frame.dimensions() != (properties.width, properties.height) {
                return Err(AnalysisError::FrameSize {
                    index,
                    actual: frame.dimensions(),
                    expected: (properties.width, properties.height),
                });
            }

            let mask = self
                .proposer
                .propose_frame(properties.width, properties.height, index);
            self.compositor.composite(&mut frame, &mask, &label);
            sink.write_frame(&frame)?;

            index += 1;
            on_progress((index as f32 / total as f32).min(MAX_REPORTED_PROGRESS));
        }

        let frames_written = sink.finish()?;
        Ok((output_path, frames_written))
    }
}

fn load_rgb(path: &Path) -> Result<RgbImage, AnalysisError> {
    let image = ImageReader::open(path)
        .map_err(|e| AnalysisError::Load(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| AnalysisError::Load(e.to_string()))?
        .decode()
        .map_err(|e| AnalysisError::Load(e.to_string()))?;
    Ok(image.to_rgb8())
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Failed to load image: {0}")]
    Load(String),
    #[error("{0}")]
    Open(MediaError),
    #[error("{0}")]
    Media(#[from] MediaError),
    #[error("Failed to encode output: {0}")]
    Encode(String),
    #[error("no region proposed")]
    EmptyRegion,
    #[error("frame {index} is {actual:?}, expected {expected:?}")]
    FrameSize {
        index: u64,
        actual: (u32, u32),
        expected: (u32, u32),
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
