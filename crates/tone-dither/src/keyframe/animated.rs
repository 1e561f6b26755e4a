//! Keyframed settings and frame resolution.

use serde::{Deserialize, Serialize};

use super::easing::{Easing, TransitionMode};
use super::interpolate::Interpolate;

/// A settings snapshot anchored to a frame index.
///
/// `easing` and `transition_mode` describe how this keyframe is reached
/// from the one before it. An absent `transition_mode` means
/// [`TransitionMode::Blend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: u32,
    pub settings: T,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_mode: Option<TransitionMode>,
}

impl<T> Keyframe<T> {
    pub fn new(frame: u32, settings: T) -> Self {
        Self {
            frame,
            settings,
            easing: Easing::Linear,
            transition_mode: None,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn transition(mut self, mode: TransitionMode) -> Self {
        self.transition_mode = Some(mode);
        self
    }

    pub fn transition_mode(&self) -> TransitionMode {
        self.transition_mode.unwrap_or_default()
    }
}

/// A settings group animated by keyframes.
///
/// Keyframes are always sorted by frame with no two sharing a frame;
/// [`insert`](Self::insert) and deserialization both maintain this.
///
/// # Example
///
/// ```
/// use tone_dither::{AnimatedSettings, AdjustmentSettings, Keyframe};
///
/// let mut anim = AnimatedSettings::new();
/// anim.insert(Keyframe::new(0, AdjustmentSettings::new().brightness(-50.0)));
/// anim.insert(Keyframe::new(10, AdjustmentSettings::new().brightness(50.0)));
///
/// let mid = anim.resolve(5, &AdjustmentSettings::default());
/// assert_eq!(mid.brightness, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnimatedSettingsRepr<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct AnimatedSettings<T> {
    pub enabled: bool,
    keyframes: Vec<Keyframe<T>>,
}

#[derive(Deserialize)]
struct AnimatedSettingsRepr<T> {
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default = "Vec::new")]
    keyframes: Vec<Keyframe<T>>,
}

fn default_enabled() -> bool {
    true
}

impl<T> From<AnimatedSettingsRepr<T>> for AnimatedSettings<T> {
    fn from(repr: AnimatedSettingsRepr<T>) -> Self {
        let mut anim = AnimatedSettings::with_keyframes(repr.keyframes);
        anim.enabled = repr.enabled;
        anim
    }
}

impl<T> Default for AnimatedSettings<T> {
    fn default() -> Self {
        Self {
            enabled: false,
            keyframes: Vec::new(),
        }
    }
}

impl<T> AnimatedSettings<T> {
    /// Empty and enabled.
    pub fn new() -> Self {
        Self {
            enabled: true,
            keyframes: Vec::new(),
        }
    }

    /// Enabled, from keyframes in any order. When frames collide the later
    /// keyframe in the input wins.
    pub fn with_keyframes(keyframes: impl IntoIterator<Item = Keyframe<T>>) -> Self {
        let mut anim = Self::new();
        for keyframe in keyframes {
            anim.insert(keyframe);
        }
        anim
    }

    /// Insert in frame order, replacing any keyframe at the same frame.
    pub fn insert(&mut self, keyframe: Keyframe<T>) {
        match self.keyframes.binary_search_by_key(&keyframe.frame, |k| k.frame) {
            Ok(i) => self.keyframes[i] = keyframe,
            Err(i) => self.keyframes.insert(i, keyframe),
        }
    }

    /// Remove the keyframe at `frame`, if any.
    pub fn remove(&mut self, frame: u32) -> Option<Keyframe<T>> {
        let i = self.keyframes.binary_search_by_key(&frame, |k| k.frame).ok()?;
        Some(self.keyframes.remove(i))
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// `true` when resolution will consult the keyframes.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.keyframes.is_empty()
    }
}

impl<T: Interpolate> AnimatedSettings<T> {
    /// Shorthand for [`resolve`].
    pub fn resolve(&self, frame: u32, fallback: &T) -> T {
        resolve(self, frame, fallback)
    }
}

/// Settings in effect at `frame`.
///
/// - Disabled or empty: `fallback`.
/// - At or before the first keyframe, at or after the last: that
///   keyframe's settings, unchanged.
/// - On a keyframe: its settings exactly.
/// - Between `k0` and `k1`: progress `t` eased by `k1.easing`, then
///   combined per `k1`'s transition mode (blend interpolates, step holds
///   `k0` until the eased `t` reaches 1).
pub fn resolve<T: Interpolate>(animated: &AnimatedSettings<T>, frame: u32, fallback: &T) -> T {
    if !animated.is_active() {
        return fallback.clone();
    }
    let keyframes = animated.keyframes();
    let (first, last) = (&keyframes[0], &keyframes[keyframes.len() - 1]);
    if frame <= first.frame {
        return first.settings.clone();
    }
    if frame >= last.frame {
        return last.settings.clone();
    }

    // first.frame < frame < last.frame, so 1 <= next < len
    let next = keyframes.partition_point(|k| k.frame <= frame);
    let (k0, k1) = (&keyframes[next - 1], &keyframes[next]);
    if frame == k0.frame {
        return k0.settings.clone();
    }

    let t = (frame - k0.frame) as f32 / (k1.frame - k0.frame) as f32;
    let eased = k1.easing.apply(t);
    match k1.transition_mode() {
        TransitionMode::Blend => k0.settings.lerp(&k1.settings, eased),
        TransitionMode::Step if eased >= 1.0 => k1.settings.clone(),
        TransitionMode::Step => k0.settings.clone(),
    }
}
