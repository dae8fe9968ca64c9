mod ffmpeg_backend;
mod in_memory_media;

pub use ffmpeg_backend::{
    FfmpegMediaBackend, output_pixel_format, parse_frame_rate, parse_probe_output,
};
pub use in_memory_media::{InMemoryMediaBackend, SyntheticClip};
