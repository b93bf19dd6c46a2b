pub mod path;
pub mod probe;

pub use path::{is_video, suggest_output_path};
pub use probe::{pack_resolution, FfprobeProbe, MediaProbe, Resolution, VideoStreamInfo};
