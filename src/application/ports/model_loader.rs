use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loaded segmentation model.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    pub name: String,
    pub device: Device,
    pub weights_path: PathBuf,
    pub size_bytes: u64,
}

#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Resolves `preference` to a concrete device and loads the weights onto it.
    async fn load(&self, preference: DevicePreference) -> Result<ModelHandle, ModelLoadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("no weights configured")]
    NotConfigured,
    #[error("weights not found: {0}")]
    WeightsNotFound(String),
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
}
