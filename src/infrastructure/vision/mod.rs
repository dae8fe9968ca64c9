mod checkpoint_model_loader;
mod device;
mod simulated_region_proposer;

pub use checkpoint_model_loader::{CheckpointModelLoader, MODEL_NAME};
pub use device::resolve_device;
pub use simulated_region_proposer::{ORBIT_STEP, SimulatedRegionProposer};
