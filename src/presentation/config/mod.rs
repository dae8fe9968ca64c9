mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ENV_PREFIX, EngineSettings, JobSettings, LoggingSettings, MediaSettings, ServerSettings,
    Settings, UploadSettings,
};
