//! Per-frame orchestration: adjust, reduce, dither.

use tone_dither::{adjust, dither, reduce, DitherError, Palette, PixelBuffer};

use super::coalescer::{RecomputeSlot, Snapshot};
use crate::error::{ProjectError, RenderError};
use crate::models::{FrameSettings, ProjectDocument, VideoInfo};

/// A loaded project with its palette resolved, ready to render frames.
pub struct FramePipeline {
    project: ProjectDocument,
    palette: Palette,
}

impl FramePipeline {
    pub fn new(project: ProjectDocument) -> Result<Self, ProjectError> {
        let palette = project.palette.resolve()?;
        Ok(Self { project, palette })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn project(&self) -> &ProjectDocument {
        &self.project
    }

    /// Settings for `frame`, or the static settings when `frame` is `None`.
    pub fn settings_for(&self, frame: Option<u32>) -> FrameSettings {
        match frame {
            Some(frame) => self.project.frame_settings(frame),
            None => FrameSettings {
                adjustments: self.project.adjustments.clone(),
                color_mode: self.project.color_mode.clone(),
                dithering: self.project.dithering.clone(),
            },
        }
    }

    /// Run the three stages with explicit settings.
    pub fn render_with(&self, input: &PixelBuffer, settings: &FrameSettings) -> Result<PixelBuffer, RenderError> {
        let adjusted = adjust(input, &settings.adjustments)?;
        let reduced = reduce(&adjusted, &settings.color_mode, &self.palette)?;
        let dithering = settings.dithering.clone().color_mode(settings.color_mode.mode);
        Ok(dither(&reduced, &self.palette, &dithering)?)
    }

    pub fn render_frame(&self, input: &PixelBuffer, frame: Option<u32>) -> Result<PixelBuffer, RenderError> {
        let settings = self.settings_for(frame);
        tracing::debug!(
            frame = ?frame,
            algorithm = %settings.dithering.algorithm,
            color_mode = %settings.color_mode.mode,
            "Rendering frame"
        );
        self.render_with(input, &settings)
    }

    /// Render a frame sequence strictly in order, handing each output to
    /// `sink` before the next frame starts.
    ///
    /// Every frame must match the first frame's dimensions.
    pub fn process_sequence<I, F>(&self, frames: I, fps: f32, mut sink: F) -> Result<VideoInfo, RenderError>
    where
        I: IntoIterator<Item = Result<PixelBuffer, RenderError>>,
        F: FnMut(u32, PixelBuffer) -> Result<(), RenderError>,
    {
        // Reject a bad frame rate before any frame is rendered
        VideoInfo::new(fps, 0)?;
        let mut expected: Option<(u32, u32)> = None;
        let mut count = 0u32;
        for input in frames {
            let input = input?;
            let actual = input.dimensions();
            match expected {
                None => expected = Some(actual),
                Some(expected) if expected != actual => {
                    return Err(DitherError::DimensionMismatch { expected, actual }.into());
                }
                Some(_) => {}
            }
            let output = self.render_frame(&input, Some(count))?;
            sink(count, output)?;
            count += 1;
        }
        let info = VideoInfo::new(fps, count)?;
        tracing::info!(frames = info.total_frames, duration = info.duration, "Processed sequence");
        Ok(info)
    }

    /// Preview worker: render the newest settings snapshot from `slot`
    /// against `source` until the slot closes. Results for snapshots that
    /// went stale while rendering are still published, tagged with their
    /// generation.
    ///
    /// Library API for interactive hosts that own a settings thread; the
    /// `ditherdeck` binary renders in batch and never calls it.
    pub fn serve_previews<F>(&self, slot: &RecomputeSlot<FrameSettings>, source: &PixelBuffer, mut publish: F)
    where
        F: FnMut(u64, Result<PixelBuffer, RenderError>),
    {
        slot.run(|Snapshot { generation, value }| {
            publish(generation, self.render_with(source, &value));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tone_dither::{
        AdjustmentSettings, AnimatedSettings, Color, ColorModeSettings, DitherAlgorithm, DitheringSettings, Keyframe,
    };

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, _| Color::grey((x * 255 / (w - 1)) as u8)).unwrap()
    }

    fn pipeline() -> FramePipeline {
        let mut project = ProjectDocument::default();
        project.animated_dithering = Some(AnimatedSettings::with_keyframes([
            Keyframe::new(0, DitheringSettings::new(DitherAlgorithm::Bayer4x4)),
            Keyframe::new(2, DitheringSettings::new(DitherAlgorithm::Atkinson)),
        ]));
        FramePipeline::new(project).unwrap()
    }

    #[test]
    fn test_output_uses_palette_only() {
        let p = pipeline();
        let out = p.render_frame(&gradient(32, 8), Some(1)).unwrap();
        assert_eq!(p.palette().quantize(&out), out);
    }

    #[test]
    fn test_frame_settings_resolved_per_frame() {
        let p = pipeline();
        assert_eq!(p.settings_for(Some(0)).dithering.algorithm, DitherAlgorithm::Bayer4x4);
        assert_eq!(p.settings_for(Some(5)).dithering.algorithm, DitherAlgorithm::Atkinson);
        assert_eq!(p.settings_for(None).dithering, DitheringSettings::default());
    }

    #[test]
    fn test_sequence_in_order() {
        let p = pipeline();
        let frames = (0..3).map(|_| Ok(gradient(16, 4)));
        let mut order = Vec::new();
        let info = p
            .process_sequence(frames, 12.0, |i, out| {
                assert_eq!(out.dimensions(), (16, 4));
                order.push(i);
                Ok(())
            })
            .unwrap();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(info.total_frames, 3);
        assert_eq!(info.duration, 0.25);
    }

    #[test]
    fn test_sequence_rejects_mixed_sizes() {
        let p = pipeline();
        let frames = vec![Ok(gradient(16, 4)), Ok(gradient(8, 4))];
        let err = p.process_sequence(frames, 24.0, |_, _| Ok(())).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Dither(DitherError::DimensionMismatch {
                expected: (16, 4),
                actual: (8, 4)
            })
        ));
    }

    #[test]
    fn test_invalid_settings_surface_as_dither_error() {
        let p = pipeline();
        let mut settings = p.settings_for(None);
        settings.adjustments = AdjustmentSettings::new().gamma(5.0);
        let err = p.render_with(&gradient(4, 4), &settings).unwrap_err();
        assert!(matches!(err, RenderError::Dither(DitherError::Configuration(_))));
    }

    #[test]
    fn test_tonal_mode_reaches_threshold_dithering() {
        let mut project = ProjectDocument::default();
        project.palette = crate::models::PaletteSource::Preset("gameboy".to_string());
        project.color_mode = ColorModeSettings::tonal(64);
        project.dithering = DitheringSettings::new(DitherAlgorithm::Bayer4x4);
        let p = FramePipeline::new(project).unwrap();

        let out = p.render_frame(&gradient(256, 8), None).unwrap();
        let darkest = p.palette().colors()[0];
        // Ramp values below the darkest entry's luminance (~39) stay darkest
        for x in 0..32 {
            for y in 0..8 {
                assert_eq!(out.pixel(x, y), darkest, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_preview_worker_renders_latest() {
        let p = pipeline();
        let slot = RecomputeSlot::new();
        let mut settings = p.settings_for(None);
        slot.submit(settings.clone());
        settings.dithering = DitheringSettings::new(DitherAlgorithm::Bayer2x2);
        let latest = slot.submit(settings);
        slot.close();

        let mut published = Vec::new();
        p.serve_previews(&slot, &gradient(8, 8), |g, r| published.push((g, r.is_ok())));
        assert_eq!(published, vec![(latest, true)]);
    }
}
