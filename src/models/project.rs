use serde::{Deserialize, Serialize};
use std::path::Path;

use tone_dither::{
    AdjustmentSettings, AnimatedSettings, ColorModeSettings, DitheringSettings, Easing, Keyframe,
    Palette,
};

use crate::error::ProjectError;

/// On-disk encoding of a project document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Yaml,
    Json,
}

impl ProjectFormat {
    pub fn from_path(path: &Path) -> Result<Self, ProjectError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ProjectError::UnknownExtension(ext)),
        }
    }
}

/// Palette given either as a preset name or inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSource {
    Preset(String),
    Inline(Palette),
}

impl PaletteSource {
    pub fn resolve(&self) -> Result<Palette, ProjectError> {
        match self {
            Self::Preset(name) => {
                Palette::preset(name).ok_or_else(|| ProjectError::UnknownPreset(name.clone()))
            }
            Self::Inline(palette) => Ok(palette.clone()),
        }
    }
}

impl Default for PaletteSource {
    fn default() -> Self {
        Self::Preset("black-white".to_string())
    }
}

/// Settings of a single frame after keyframe resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSettings {
    pub adjustments: AdjustmentSettings,
    pub color_mode: ColorModeSettings,
    pub dithering: DitheringSettings,
}

/// A saved project: palette, static settings, and optional keyframe tracks.
///
/// Missing sections take neutral defaults. The source image is not part of
/// the document; it is passed alongside on the command line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDocument {
    pub palette: PaletteSource,
    pub adjustments: AdjustmentSettings,
    pub color_mode: ColorModeSettings,
    pub dithering: DitheringSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated_adjustments: Option<AnimatedSettings<AdjustmentSettings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated_color_mode: Option<AnimatedSettings<ColorModeSettings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated_dithering: Option<AnimatedSettings<DitheringSettings>>,
}

impl ProjectDocument {
    /// Load and validate a project file (`.yaml`, `.yml` or `.json`).
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let format = ProjectFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let project = Self::parse(&content, format)?;
        tracing::info!(
            path = %path.display(),
            algorithm = %project.dithering.algorithm,
            keyframes = project.keyframe_count(),
            "Loaded project"
        );
        Ok(project)
    }

    /// Parse and validate a document from a string.
    pub fn parse(content: &str, format: ProjectFormat) -> Result<Self, ProjectError> {
        let project: Self = match format {
            ProjectFormat::Yaml => serde_yaml::from_str(content)?,
            ProjectFormat::Json => serde_json::from_str(content)?,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn to_string(&self, format: ProjectFormat) -> Result<String, ProjectError> {
        Ok(match format {
            ProjectFormat::Yaml => serde_yaml::to_string(self)?,
            ProjectFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let content = self.to_string(ProjectFormat::from_path(path)?)?;
        std::fs::write(path, content).map_err(|source| ProjectError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the palette, every static settings record and every keyframe.
    pub fn validate(&self) -> Result<(), ProjectError> {
        self.palette.resolve()?;
        self.adjustments.validate()?;
        self.color_mode.validate()?;
        self.dithering.validate()?;
        for k in self.animated_adjustments.iter().flat_map(|a| a.keyframes()) {
            k.settings.validate()?;
        }
        for k in self.animated_color_mode.iter().flat_map(|a| a.keyframes()) {
            k.settings.validate()?;
        }
        for k in self.animated_dithering.iter().flat_map(|a| a.keyframes()) {
            k.settings.validate()?;
        }
        Ok(())
    }

    pub fn keyframe_count(&self) -> usize {
        self.animated_adjustments.as_ref().map_or(0, |a| a.keyframes().len())
            + self.animated_color_mode.as_ref().map_or(0, |a| a.keyframes().len())
            + self.animated_dithering.as_ref().map_or(0, |a| a.keyframes().len())
    }

    /// Settings in effect at `frame`. Tracks that are absent, disabled or
    /// empty fall back to the static settings.
    pub fn frame_settings(&self, frame: u32) -> FrameSettings {
        FrameSettings {
            adjustments: match &self.animated_adjustments {
                Some(track) => track.resolve(frame, &self.adjustments),
                None => self.adjustments.clone(),
            },
            color_mode: match &self.animated_color_mode {
                Some(track) => track.resolve(frame, &self.color_mode),
                None => self.color_mode.clone(),
            },
            dithering: match &self.animated_dithering {
                Some(track) => track.resolve(frame, &self.dithering),
                None => self.dithering.clone(),
            },
        }
    }

    /// Starter document written by `ditherdeck init`: a Game Boy palette
    /// and a one-second exposure fade-in at 24 fps.
    pub fn starter() -> Self {
        Self {
            palette: PaletteSource::Preset("gameboy".to_string()),
            adjustments: AdjustmentSettings::new().contrast(10.0),
            animated_adjustments: Some(AnimatedSettings::with_keyframes([
                Keyframe::new(0, AdjustmentSettings::new().exposure(-2.0).contrast(10.0)),
                Keyframe::new(24, AdjustmentSettings::new().contrast(10.0)).easing(Easing::EaseOut),
            ])),
            ..Self::default()
        }
    }
}
