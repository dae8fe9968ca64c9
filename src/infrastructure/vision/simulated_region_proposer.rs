use crate::application::ports::RegionProposer;
use crate::domain::Mask;

/// Angular step per frame of the orbiting video target, in radians.
pub const ORBIT_STEP: f64 = 0.05;

/// Stand-in for model output: a fixed disc for still images and a disc
/// orbiting the frame centre for video.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedRegionProposer;

impl SimulatedRegionProposer {
    pub fn new() -> Self {
        Self
    }

    /// Centre of the video target at `frame_index`, truncated toward zero.
    pub fn orbit_center(width: u32, height: u32, frame_index: u64) -> (i64, i64) {
        let w = f64::from(width);
        let h = f64::from(height);
        let angle = ORBIT_STEP * frame_index as f64;
        let cx = w / 2.0 + (w / 4.0) * angle.sin();
        let cy = h / 2.0 + (h / 4.0) * angle.cos();
        (cx as i64, cy as i64)
    }
}

impl RegionProposer for SimulatedRegionProposer {
    fn propose_image(&self, width: u32, height: u32) -> Mask {
        let center = (i64::from(width / 2), i64::from(height / 2));
        let radius = width.min(height) / 4;
        Mask::filled_circle(width, height, center, radius)
    }

    fn propose_frame(&self, width: u32, height: u32, frame_index: u64) -> Mask {
        let center = Self::orbit_center(width, height, frame_index);
        let radius = width.min(height) / 6;
        Mask::filled_circle(width, height, center, radius)
    }
}
