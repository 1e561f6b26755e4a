use serde::Serialize;

use crate::error::RenderError;

/// Timing of a frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoInfo {
    pub fps: f32,
    pub total_frames: u32,
    /// Seconds.
    pub duration: f32,
}

impl VideoInfo {
    pub fn new(fps: f32, total_frames: u32) -> Result<Self, RenderError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(RenderError::InvalidFrameRate(fps));
        }
        Ok(Self {
            fps,
            total_frames,
            duration: total_frames as f32 / fps,
        })
    }

    /// Presentation time of `frame` in seconds.
    pub fn timestamp(&self, frame: u32) -> f32 {
        frame as f32 / self.fps
    }

    /// Frame shown at `seconds`, clamped to the sequence.
    pub fn frame_at(&self, seconds: f32) -> u32 {
        let last = self.total_frames.saturating_sub(1);
        ((seconds.max(0.0) * self.fps).floor() as u32).min(last)
    }
}
