//! Project files, PNG I/O and the frame pipeline working together.

mod common;

use common::*;
use pretty_assertions::assert_eq;

use ditherdeck::error::{ProjectError, RenderError};
use ditherdeck::models::ProjectDocument;
use ditherdeck::rendering::{decode_png, encode_png, read_png};
use ditherdeck::services::FramePipeline;
use tone_dither::{extract, Color, DitherAlgorithm, DitherError, ExtractAlgorithm, Palette, PixelBuffer};

#[test]
fn test_render_from_project_file() {
    let dir = tempfile::tempdir().unwrap();
    let project_path = write_project(dir.path(), "project.yaml", ANIMATED_PROJECT);
    let input = write_image(dir.path(), "in.png", &grey_ramp(64, 16));

    let pipeline = FramePipeline::new(ProjectDocument::load(&project_path).unwrap()).unwrap();
    let out = pipeline.render_frame(&read_png(&input).unwrap(), Some(1)).unwrap();

    assert_eq!(out.dimensions(), (64, 16));
    assert_palette_only(&out, &Palette::preset("grayscale-4").unwrap());

    let bytes = encode_png(&out).unwrap();
    assert_png(&bytes);
    assert_eq!(decode_png(&bytes).unwrap(), out);
}

#[test]
fn test_frames_follow_keyframes() {
    let project = ProjectDocument::parse(ANIMATED_PROJECT, ditherdeck::models::ProjectFormat::Yaml).unwrap();
    assert_eq!(project.frame_settings(1).dithering.algorithm, DitherAlgorithm::Bayer4x4);
    assert_eq!(project.frame_settings(2).dithering.algorithm, DitherAlgorithm::FloydSteinberg);
    assert_eq!(project.frame_settings(0).adjustments.brightness, -40.0);
    assert_eq!(project.frame_settings(3).adjustments.brightness, 40.0);
    assert_eq!(project.frame_settings(99).adjustments.brightness, 40.0);

    let pipeline = FramePipeline::new(project).unwrap();
    let frames = (0..4).map(|_| Ok(grey_ramp(32, 8)));
    let mut outputs = Vec::new();
    let info = pipeline
        .process_sequence(frames, 8.0, |_, out| {
            outputs.push(out);
            Ok(())
        })
        .unwrap();

    assert_eq!(info.total_frames, 4);
    assert_eq!(info.duration, 0.5);
    // Brightening pushes more pixels to the lightest shade
    let white = |b: &PixelBuffer| b.pixels().filter(|&c| c == Color::WHITE).count();
    assert!(white(&outputs[3]) > white(&outputs[0]));
}

#[test]
fn test_sequence_read_error_stops_processing() {
    let pipeline = FramePipeline::new(ProjectDocument::default()).unwrap();
    let frames = vec![
        Ok(grey_ramp(8, 8)),
        Err(RenderError::PngDecode("truncated".to_string())),
        Ok(grey_ramp(8, 8)),
    ];
    let mut rendered = 0;
    let err = pipeline
        .process_sequence(frames, 24.0, |_, _| {
            rendered += 1;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, RenderError::PngDecode(_)));
    assert_eq!(rendered, 1);
}

#[test]
fn test_extracted_palette_drives_render() {
    let image = quadrants(32);
    let palette = extract(&image, 4, ExtractAlgorithm::MedianCut).unwrap();
    assert_eq!(palette.len(), 4);

    let mut project = ProjectDocument::default();
    project.palette = ditherdeck::models::PaletteSource::Inline(palette.clone());
    let pipeline = FramePipeline::new(project).unwrap();
    let out = pipeline.render_frame(&image, None).unwrap();

    // Flat regions already match palette colors exactly
    assert_eq!(out, palette.quantize(&image));
}

#[test]
fn test_bad_project_reports_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_project(dir.path(), "bad.json", r#"{ "color_mode": { "mode": "tonal", "shades": 1 } }"#);
    let err = ProjectDocument::load(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Invalid(DitherError::InvalidPalette(_))));
}

#[test]
fn test_missing_project_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");
    let err = ProjectDocument::load(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Read { .. }));
    assert!(err.to_string().contains("missing.yaml"));
}
