use std::path::PathBuf;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use crate::application::ports::DevicePreference;
use crate::infrastructure::observability::DEFAULT_LOG_FILTER;

use super::Environment;

pub const ENV_PREFIX: &str = "EIDOS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub uploads: UploadSettings,
    pub jobs: JobSettings,
    pub media: MediaSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.<environment>.toml` when
    /// present, then `EIDOS_*` variables (`__` separates nested keys).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub device: DevicePreference,
    pub weights_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            device: DevicePreference::Auto,
            weights_path: None,
            output_dir: PathBuf::from("outputs"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_upload_mb: usize,
}

impl UploadSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_upload_mb: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    pub queue_capacity: usize,
    pub max_concurrent_jobs: usize,
    pub delete_input_after_processing: bool,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            max_concurrent_jobs: 2,
            delete_input_after_processing: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub video_codec: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}
