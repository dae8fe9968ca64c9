use std::path::Path;

use crate::application::ports::{Device, DevicePreference};

const NVIDIA_DEVICE_NODE: &str = "/dev/nvidiactl";

/// Picks CUDA for `Auto` when an NVIDIA driver is visible, otherwise CPU.
pub fn resolve_device(preference: DevicePreference) -> Device {
    match preference {
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Cuda => Device::Cuda,
        DevicePreference::Auto if cuda_visible() => Device::Cuda,
        DevicePreference::Auto => Device::Cpu,
    }
}

fn cuda_visible() -> bool {
    let env_devices = std::env::var("CUDA_VISIBLE_DEVICES")
        .map(|v| {
            let v = v.trim();
            !v.is_empty() && v != "-1"
        })
        .unwrap_or(false);

    env_devices || Path::new(NVIDIA_DEVICE_NODE).exists()
}
