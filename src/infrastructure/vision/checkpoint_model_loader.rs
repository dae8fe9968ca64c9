use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::{DevicePreference, ModelHandle, ModelLoadError, ModelLoader};

use super::resolve_device;

pub const MODEL_NAME: &str = "sam3";

/// Locates a segmentation checkpoint on disk.
///
/// Only the file's presence and size are checked. The weights themselves
/// are never decoded, so a "ready" engine still runs simulated detection.
pub struct CheckpointModelLoader {
    weights_path: Option<PathBuf>,
}

impl CheckpointModelLoader {
    pub fn new(weights_path: Option<PathBuf>) -> Self {
        Self { weights_path }
    }
}

#[async_trait]
impl ModelLoader for CheckpointModelLoader {
    async fn load(&self, preference: DevicePreference) -> Result<ModelHandle, ModelLoadError> {
        let device = resolve_device(preference);
        tracing::info!(device = %device, "Initializing segmentation engine");

        let path = self
            .weights_path
            .as_ref()
            .ok_or(ModelLoadError::NotConfigured)?;

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            ModelLoadError::WeightsNotFound(format!("{}: {e}", path.display()))
        })?;

        if !metadata.is_file() {
            return Err(ModelLoadError::InvalidWeights(format!(
                "{} is not a file",
                path.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(ModelLoadError::InvalidWeights(format!(
                "{} is empty",
                path.display()
            )));
        }

        Ok(ModelHandle {
            name: MODEL_NAME.to_string(),
            device,
            weights_path: path.clone(),
            size_bytes: metadata.len(),
        })
    }
}
