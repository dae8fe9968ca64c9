/// Frame count assumed when the container does not report one.
pub const FALLBACK_FRAME_COUNT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: u64,
}

impl VideoProperties {
    /// Frame count used as the progress denominator.
    pub fn effective_frame_count(&self) -> u64 {
        if self.frame_count == 0 {
            FALLBACK_FRAME_COUNT
        } else {
            self.frame_count
        }
    }

    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}
