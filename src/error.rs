use std::path::PathBuf;

use thiserror::Error;
use tone_dither::DitherError;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported project file extension: {0}")]
    UnknownExtension(String),

    #[error("Unknown palette preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid project: {0}")]
    Invalid(#[from] DitherError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    UnsupportedLayout(String),

    #[error("No frames found in {0}")]
    NoFrames(PathBuf),

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f32),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
