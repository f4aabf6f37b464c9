use std::time::Duration;

/// Sent after a job's tiles have been merged into the raster.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub generation: u64,
    pub size: u32,
    pub center: String,
    pub scale: String,
    pub tiles_merged: usize,
    pub render_duration: Duration,
}
