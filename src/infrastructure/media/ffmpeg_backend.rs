use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;

use crate::application::ports::{FrameSink, FrameSource, MediaBackend, MediaError};
use crate::domain::VideoProperties;

const DEFAULT_FPS: f64 = 30.0;

/// Video I/O through the system `ffprobe` and `ffmpeg` binaries. Frames
/// cross the process boundary as raw `rgb24`.
#[derive(Debug, Clone)]
pub struct FfmpegMediaBackend {
    ffmpeg_path: String,
    ffprobe_path: String,
    video_codec: String,
}

impl FfmpegMediaBackend {
    pub fn new(
        ffmpeg_path: impl Into<String>,
        ffprobe_path: impl Into<String>,
        video_codec: impl Into<String>,
    ) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            video_codec: video_codec.into(),
        }
    }

    fn probe(&self, path: &Path) -> Result<VideoProperties, MediaError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| MediaError::OpenFailed(format!("ffprobe failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::OpenFailed(format!(
                "ffprobe error: {}",
                stderr.trim()
            )));
        }

        parse_probe_output(&output.stdout)
    }
}

impl Default for FfmpegMediaBackend {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe", "libx264")
    }
}

impl MediaBackend for FfmpegMediaBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        if !path.is_file() {
            return Err(MediaError::OpenFailed(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let properties = self.probe(path)?;

        let mut child = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::OpenFailed(format!("ffmpeg failed: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::OpenFailed("ffmpeg stdout unavailable".to_string()))?;

        Ok(Box::new(FfmpegFrameSource {
            child,
            stdout,
            properties,
        }))
    }

    fn create(
        &self,
        path: &Path,
        properties: &VideoProperties,
    ) -> Result<Box<dyn FrameSink>, MediaError> {
        let size = format!("{}x{}", properties.width, properties.height);
        let fps = if properties.fps.is_finite() && properties.fps > 0.0 {
            properties.fps
        } else {
            DEFAULT_FPS
        };

        let mut child = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-y", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s"])
            .arg(&size)
            .arg("-r")
            .arg(fps.to_string())
            .args(["-i", "-", "-c:v"])
            .arg(&self.video_codec)
            .arg("-pix_fmt")
            .arg(output_pixel_format(properties.width, properties.height))
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MediaError::EncodeFailed(format!("ffmpeg failed: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MediaError::EncodeFailed("ffmpeg stdin unavailable".to_string()))?;

        Ok(Box::new(FfmpegFrameSink {
            child: Some(child),
            stdin: Some(stdin),
            width: properties.width,
            height: properties.height,
            frames_written: 0,
        }))
    }
}

struct FfmpegFrameSource {
    child: Child,
    stdout: ChildStdout,
    properties: VideoProperties,
}

impl FrameSource for FfmpegFrameSource {
    fn properties(&self) -> VideoProperties {
        self.properties
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, MediaError> {
        let frame_len = self.properties.frame_len();
        let mut buf = vec![0u8; frame_len];
        let mut filled = 0;

        while filled < frame_len {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MediaError::Io(e)),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < frame_len {
            return Err(MediaError::DecodeFailed(format!(
                "truncated frame: {filled} of {frame_len} bytes"
            )));
        }

        RgbImage::from_raw(self.properties.width, self.properties.height, buf)
            .map(Some)
            .ok_or_else(|| MediaError::DecodeFailed("frame buffer size mismatch".to_string()))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

struct FfmpegFrameSink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
    frames_written: u64,
}

impl FrameSink for FfmpegFrameSink {
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

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| MediaError::EncodeFailed("encoder input closed".to_string()))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| MediaError::EncodeFailed(format!("write to ffmpeg failed: {e}")))?;

        self.frames_written += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<u64, MediaError> {
        drop(self.stdin.take());

        let child = self
            .child
            .take()
            .ok_or_else(|| MediaError::EncodeFailed("encoder already finished".to_string()))?;
        let output = child
            .wait_with_output()
            .map_err(|e| MediaError::EncodeFailed(format!("ffmpeg wait failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::EncodeFailed(format!(
                "ffmpeg error: {}",
                stderr.trim()
            )));
        }

        Ok(self.frames_written)
    }
}

impl Drop for FfmpegFrameSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

/// Reads the first video stream out of `ffprobe -of json` output. A missing
/// or unparsable frame count becomes 0.
pub fn parse_probe_output(json: &[u8]) -> Result<VideoProperties, MediaError> {
    let probe: ProbeOutput = serde_json::from_slice(json)
        .map_err(|e| MediaError::OpenFailed(format!("invalid ffprobe output: {e}")))?;

    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| MediaError::OpenFailed("no video stream".to_string()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(MediaError::OpenFailed(
                "video stream has no dimensions".to_string(),
            ));
        }
    };

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(parse_frame_rate))
        .unwrap_or(DEFAULT_FPS);

    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0);

    Ok(VideoProperties {
        width,
        height,
        fps,
        frame_count,
    })
}

/// Chroma-subsampled output needs even dimensions. Odd-sized frames keep
/// full chroma so the output matches the input size exactly.
pub fn output_pixel_format(width: u32, height: u32) -> &'static str {
    if width % 2 == 0 && height % 2 == 0 {
        "yuv420p"
    } else {
        "yuv444p"
    }
}

/// Parses `"30000/1001"` or `"25"`. Zero and malformed rates yield `None`.
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
