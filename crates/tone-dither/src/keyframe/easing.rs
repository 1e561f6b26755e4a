//! Easing curves and transition modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DitherError, Result};

/// Remaps linear progress `t` in `[0, 1]` onto a curve with the same
/// endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    /// `t²`
    EaseIn,
    /// `1 - (1 - t)²`
    EaseOut,
    /// Smoothstep, `3t² - 2t³`
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut];

    /// Apply the curve; `t` is clamped to `[0, 1]` first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = DitherError;

    fn from_str(s: &str) -> Result<Self> {
        Easing::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| DitherError::config(format!("unknown easing '{s}'")))
    }
}

/// How a keyframe is approached from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionMode {
    /// Numeric fields interpolate; discrete fields switch at the keyframe.
    #[default]
    Blend,
    /// Hold the previous keyframe's settings until the keyframe is reached.
    Step,
}
