use crate::domain::Mask;

/// Source of the region to highlight in an image or video frame.
pub trait RegionProposer: Send + Sync {
    fn propose_image(&self, width: u32, height: u32) -> Mask;

    fn propose_frame(&self, width: u32, height: u32, frame_index: u64) -> Mask;
}
